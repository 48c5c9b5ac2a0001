use super::weighted::{Weighted, WeightedItem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named group of items scheduled to be merged into one output.
///
/// `members` keeps assignment order and `total_bytes` is always the sum of
/// the member sizes. Members are identifiers only; content stays external.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub ordinal: usize,
    pub members: Vec<String>,
    pub total_bytes: u64,
}

impl Bucket {
    pub fn new(session: &str, ordinal: usize) -> Self {
        Self {
            name: format!("{}-{}", session, ordinal),
            ordinal,
            members: Vec::new(),
            total_bytes: 0,
        }
    }

    pub(crate) fn push(&mut self, item: &WeightedItem) {
        self.members.push(item.id.clone());
        self.total_bytes += item.size;
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Weighted for Bucket {
    fn id(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.total_bytes
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bucket[{}, {}, {:?}]",
            self.name, self.total_bytes, self.members
        )
    }
}
