pub mod preorder;
pub mod sequence;

pub use preorder::{preorder_items, preorder_leaves};
pub use sequence::{ChainSource, LiveChain, OrderedSequence, SnapshotChain};
