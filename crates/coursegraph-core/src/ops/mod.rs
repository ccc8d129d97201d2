pub mod chain_ops;
pub mod snapshot_ops;
pub mod store;
pub mod tree_ops;

pub use chain_ops::ChainStatus;
pub use store::Store;
