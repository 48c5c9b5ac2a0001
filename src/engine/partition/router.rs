use super::partition_map::PartitionMap;
use crate::engine::errors::PartitionMapError;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

/// Routes bucket names to partitions using a validated [`PartitionMap`].
///
/// Partitions that received no bucket are legal; every other inconsistency in
/// the map is rejected at load time.
#[derive(Debug, Clone)]
pub struct PartitionRouter {
    routes: HashMap<String, u32>,
}

impl PartitionRouter {
    pub fn load(path: &Path, partitions: usize) -> Result<Self, PartitionMapError> {
        let map = PartitionMap::load(path)?;
        Self::validate(&map, partitions, &path.display().to_string())
    }

    pub fn from_map(map: &PartitionMap, partitions: usize) -> Result<Self, PartitionMapError> {
        Self::validate(map, partitions, "partition map")
    }

    fn validate(
        map: &PartitionMap,
        partitions: usize,
        location: &str,
    ) -> Result<Self, PartitionMapError> {
        if partitions == 0 {
            return Err(PartitionMapError::NoPartitions);
        }

        let mut routes = HashMap::with_capacity(map.len());
        let mut seen = BTreeSet::new();

        for entry in map.entries() {
            if routes.contains_key(&entry.bucket) {
                return Err(PartitionMapError::DuplicateBucket {
                    bucket: entry.bucket.clone(),
                    location: location.to_string(),
                });
            }
            if entry.partition as usize >= partitions {
                return Err(PartitionMapError::PartitionOutOfRange {
                    partition: entry.partition,
                    partitions,
                });
            }
            routes.insert(entry.bucket.clone(), entry.partition);
            seen.insert(entry.partition);
        }
        // Every index is below `partitions`, which also bounds the distinct count.

        debug!(
            target: "partition_router::load",
            location,
            buckets = routes.len(),
            used_partitions = seen.len(),
            partitions,
            "Partition map validated"
        );

        Ok(Self { routes })
    }

    pub fn route(&self, bucket: &str) -> Result<u32, PartitionMapError> {
        self.routes
            .get(bucket)
            .copied()
            .ok_or_else(|| PartitionMapError::UnknownBucket(bucket.to_string()))
    }

    /// Buckets routed to `partition`, sorted by name.
    pub fn buckets_for(&self, partition: u32) -> Vec<&str> {
        let mut buckets: Vec<&str> = self
            .routes
            .iter()
            .filter(|(_, p)| **p == partition)
            .map(|(bucket, _)| bucket.as_str())
            .collect();
        buckets.sort_unstable();
        buckets
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
