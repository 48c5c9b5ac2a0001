pub mod counters;
pub mod crush_spec;
pub mod merge_task;
pub mod merger;
pub mod output_namer;
pub mod provenance;

pub use counters::MergeCounters;
pub use crush_spec::{CrushSpec, CrushSpecs};
pub use merge_task::MergeTask;
pub use merger::{BucketMerger, MergeOutcome, OutputLayout};
pub use output_namer::OutputNamer;
pub use provenance::Provenance;
