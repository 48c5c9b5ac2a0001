use super::partition_map::PartitionMap;
use crate::engine::bucket::{Bucket, Bucketer};
use crate::engine::errors::{BucketerError, PartitionMapError};
use tracing::{debug, info};

const SESSION_NAME: &str = "partition";

/// Spreads whole buckets across a fixed number of partitions.
///
/// Runs once per job after every directory has been bucketed: each bucket is a
/// single weighted item and the fixed-count bucketer balances their byte totals
/// over `partitions` groups. Single-item groups are kept since every group is a
/// worker.
#[derive(Debug, Clone, Copy)]
pub struct PartitionAssigner {
    partitions: usize,
}

impl PartitionAssigner {
    pub fn new(partitions: usize) -> Result<Self, PartitionMapError> {
        if partitions == 0 {
            return Err(PartitionMapError::NoPartitions);
        }
        Ok(Self { partitions })
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    pub fn assign(&self, buckets: &[Bucket]) -> Result<PartitionMap, BucketerError> {
        let mut bucketer = Bucketer::fixed_count(self.partitions, false)?;
        bucketer.reset(SESSION_NAME)?;
        for bucket in buckets {
            bucketer.add(bucket)?;
        }

        let mut groups = bucketer.create_buckets()?;
        groups.sort_by_key(|g| g.ordinal);

        let mut map = PartitionMap::new();
        for group in &groups {
            debug!(
                target: "partition_assigner::assign",
                partition = group.ordinal,
                buckets = group.len(),
                bytes = group.total_bytes,
                "Assigned partition"
            );
            for member in &group.members {
                map.insert(member.clone(), group.ordinal as u32);
            }
        }

        info!(
            target: "partition_assigner::assign",
            buckets = buckets.len(),
            partitions = self.partitions,
            "Built partition map"
        );
        Ok(map)
    }
}
