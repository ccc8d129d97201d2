pub mod course;
pub mod edge;
pub mod item;
pub mod snapshot;

pub use course::Course;
pub use edge::Edge;
pub use item::{Item, ItemKind};
pub use snapshot::{FrozenSnapshot, Snapshot, SnapshotEdge, SnapshotItem};
