use serde::Serialize;
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeCounters {
    pub files_merged: u64,
    pub records_merged: u64,
}

impl AddAssign for MergeCounters {
    fn add_assign(&mut self, other: Self) {
        self.files_merged += other.files_merged;
        self.records_merged += other.records_merged;
    }
}
