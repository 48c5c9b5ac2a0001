use serde::{Deserialize, Serialize};

/// Anything the bucketer can pack: an identifier plus a size in bytes.
pub trait Weighted {
    fn id(&self) -> &str;
    fn size(&self) -> u64;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedItem {
    pub id: String,
    pub size: u64,
}

impl WeightedItem {
    pub fn new(id: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            size,
        }
    }
}

impl Weighted for WeightedItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// An eligible source file reported by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub size: u64,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

impl Weighted for SourceFile {
    fn id(&self) -> &str {
        &self.path
    }

    fn size(&self) -> u64 {
        self.size
    }
}
