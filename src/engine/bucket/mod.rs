pub mod bucket;
pub mod bucketer;
pub mod weighted;

pub use bucket::Bucket;
pub use bucketer::Bucketer;
pub use weighted::{SourceFile, Weighted, WeightedItem};
