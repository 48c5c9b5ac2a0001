pub mod assigner;
pub mod partition_map;
pub mod router;

pub use assigner::PartitionAssigner;
pub use partition_map::{PartitionEntry, PartitionMap};
pub use router::PartitionRouter;
