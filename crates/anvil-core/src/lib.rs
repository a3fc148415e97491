pub mod block;
pub mod chain;
pub mod constants;
pub mod merkle_tree;
pub mod receipt;
pub mod registry;

pub use block::{Block, BlockError};
pub use chain::{ChainConfigError, ChainParameters, ChainType};
pub use merkle_tree::{HashTree, MerkleError};
pub use receipt::{DatumType, Receipt, ReceiptError, SignedReceipt};
pub use registry::{BlockStore, NodeRegistry, NodeRegistryEntry};
