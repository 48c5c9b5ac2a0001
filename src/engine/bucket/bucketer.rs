use super::bucket::Bucket;
use super::weighted::{Weighted, WeightedItem};
use crate::engine::errors::BucketerError;
use tracing::{debug, info};

/// Pending state of one packing session.
#[derive(Debug, Default)]
struct BucketerSession {
    name: String,
    items: Vec<WeightedItem>,
    size: u64,
}

/// Arranges weighted items into size-balanced buckets.
///
/// Callers drive one session at a time:
/// 1. [`Bucketer::reset`] with the session name (usually a directory).
/// 2. [`Bucketer::add`] zero or more times.
/// 3. [`Bucketer::create_buckets`], which clears the session.
///
/// The number of buckets is `ceil(total / bucket_size)` capped at `max_buckets`,
/// or exactly `max_buckets` when `bucket_size` is zero. Items are sorted by
/// descending size and each one goes to the currently smallest bucket (LPT).
#[derive(Debug)]
pub struct Bucketer {
    max_buckets: usize,
    bucket_size: u64,
    exclude_single_item_buckets: bool,
    session: Option<BucketerSession>,
}

impl Bucketer {
    pub fn new(
        max_buckets: usize,
        bucket_size: u64,
        exclude_single_item_buckets: bool,
    ) -> Result<Self, BucketerError> {
        if max_buckets < 1 {
            return Err(BucketerError::InvalidMaxBuckets(max_buckets));
        }
        Ok(Self {
            max_buckets,
            bucket_size,
            exclude_single_item_buckets,
            session: None,
        })
    }

    /// Always creates exactly `num_buckets` buckets for a non-empty session.
    pub fn fixed_count(
        num_buckets: usize,
        exclude_single_item_buckets: bool,
    ) -> Result<Self, BucketerError> {
        Self::new(num_buckets, 0, exclude_single_item_buckets)
    }

    /// Starts a session named `name`, discarding anything pending.
    pub fn reset(&mut self, name: &str) -> Result<(), BucketerError> {
        if name.is_empty() {
            return Err(BucketerError::EmptyName);
        }
        self.session = Some(BucketerSession {
            name: name.to_string(),
            ..Default::default()
        });
        Ok(())
    }

    /// Adds an item to the session. Zero-size items are ignored.
    pub fn add<W: Weighted + ?Sized>(&mut self, item: &W) -> Result<(), BucketerError> {
        let session = self.session.as_mut().ok_or(BucketerError::NoActiveSession)?;

        let size = item.size();
        if size != 0 {
            session.items.push(WeightedItem::new(item.id(), size));
            session.size += size;
        }
        Ok(())
    }

    /// Packs the pending items and clears the session.
    pub fn create_buckets(&mut self) -> Result<Vec<Bucket>, BucketerError> {
        let BucketerSession {
            name,
            mut items,
            size,
        } = self.session.take().ok_or(BucketerError::NoActiveSession)?;

        // Stable: equal sizes keep insertion order.
        items.sort_by(|a, b| b.size.cmp(&a.size));

        let num_buckets = self.bucket_count(size);
        let mut buckets: Vec<Bucket> = (0..num_buckets).map(|i| Bucket::new(&name, i)).collect();

        if num_buckets == 1 {
            let bucket = &mut buckets[0];
            for item in &items {
                bucket.push(item);
            }
        } else if num_buckets > 1 {
            // Invariant: `buckets` is ordered by ascending total_bytes.
            for item in &items {
                let mut smallest = buckets.remove(0);
                smallest.push(item);
                let pos = buckets.partition_point(|b| b.total_bytes <= smallest.total_bytes);
                buckets.insert(pos, smallest);
            }
        }

        if self.exclude_single_item_buckets {
            let before = buckets.len();
            buckets.retain(|b| b.len() >= 2);
            if before != buckets.len() {
                debug!(
                    target: "bucketer::create_buckets",
                    session = %name,
                    dropped = before - buckets.len(),
                    "Dropped buckets with fewer than two items"
                );
            }
        }

        info!(
            target: "bucketer::create_buckets",
            session = %name,
            items = items.len(),
            total_bytes = size,
            planned = num_buckets,
            returned = buckets.len(),
            "Created buckets"
        );

        Ok(buckets)
    }

    fn bucket_count(&self, total: u64) -> usize {
        if total == 0 {
            return 0;
        }
        if self.bucket_size == 0 {
            return self.max_buckets;
        }
        let needed = total.div_ceil(self.bucket_size);
        usize::try_from(needed)
            .unwrap_or(usize::MAX)
            .min(self.max_buckets)
    }

    /// Number of items pending in the current session.
    pub fn count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.items.len())
    }

    /// Total bytes pending in the current session.
    pub fn size(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.size)
    }

    /// Name of the active session, if any.
    pub fn name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.name.as_str())
    }
}
