pub mod bucket;
pub mod codec;
pub mod crush;
pub mod errors;
pub mod job;
pub mod partition;

pub use errors::*;
