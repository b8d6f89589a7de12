//! Per chromosome/strand sorted interval index.
//!
//! Intervals are grouped by chromosome and strand and sorted by start. Each
//! group also keeps a running maximum of interval ends, which is monotone and
//! therefore binary-searchable: every interval before the first prefix whose
//! maximum end reaches the query start ends too early to overlap it. Together
//! with a binary search on start for the upper bound this bounds each query
//! to a window instead of the whole group.

use ahash::AHashMap;

use crate::types::Strand;

/// A closed genomic interval `[start, end]` carrying a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval<T> {
    pub start: u64,
    pub end: u64,
    pub payload: T,
}

impl<T> Interval<T> {
    pub fn new(start: u64, end: u64, payload: T) -> Self {
        Interval {
            start,
            end,
            payload,
        }
    }

    /// Closed-interval overlap test.
    pub fn overlaps(&self, start: u64, end: u64) -> bool {
        self.start <= end && self.end >= start
    }

    /// Distance from a point to this interval (0 when inside).
    pub fn distance_to(&self, point: u64) -> u64 {
        if point < self.start {
            self.start - point
        } else if point > self.end {
            point - self.end
        } else {
            0
        }
    }
}

/// Result of a nearest-interval query.
#[derive(Debug, Clone, Copy)]
pub struct Nearest<'a, T> {
    pub distance: u64,
    pub interval: &'a Interval<T>,
}

#[derive(Debug, Clone)]
struct Group<T> {
    intervals: Vec<Interval<T>>,
    /// `(max end, index of the interval holding it)` over `intervals[..=i]`.
    max_end: Vec<(u64, usize)>,
}

impl<T> Group<T> {
    fn new(mut intervals: Vec<Interval<T>>) -> Self {
        // Stable: equal starts keep insertion order.
        intervals.sort_by_key(|iv| iv.start);

        let mut max_end = Vec::with_capacity(intervals.len());
        let mut running = (0u64, 0usize);
        for (i, iv) in intervals.iter().enumerate() {
            if i == 0 || iv.end > running.0 {
                running = (iv.end, i);
            }
            max_end.push(running);
        }

        Group { intervals, max_end }
    }

    fn overlapping(&self, start: u64, end: u64) -> impl Iterator<Item = &Interval<T>> + '_ {
        let lo = self.max_end.partition_point(|&(max_end, _)| max_end < start);
        let hi = self.intervals.partition_point(|iv| iv.start <= end);
        let window = if lo < hi {
            &self.intervals[lo..hi]
        } else {
            &self.intervals[..0]
        };
        window.iter().filter(move |iv| iv.overlaps(start, end))
    }

    fn nearest(&self, point: u64) -> Option<Nearest<'_, T>> {
        let split = self.intervals.partition_point(|iv| iv.start <= point);

        let left = split.checked_sub(1).map(|i| {
            let (max_end, idx) = self.max_end[i];
            (point.saturating_sub(max_end), idx)
        });
        let right = self
            .intervals
            .get(split)
            .map(|iv| (iv.distance_to(point), split));

        let (distance, idx) = match (left, right) {
            (Some(l), Some(r)) => {
                if r.0 < l.0 {
                    r
                } else {
                    l
                }
            }
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (None, None) => return None,
        };

        Some(Nearest {
            distance,
            interval: &self.intervals[idx],
        })
    }
}

#[derive(Debug, Clone)]
struct Stranded<T> {
    positive: Group<T>,
    negative: Group<T>,
}

impl<T> Stranded<T> {
    fn get(&self, strand: Strand) -> &Group<T> {
        match strand {
            Strand::Positive => &self.positive,
            Strand::Negative => &self.negative,
        }
    }
}

/// Immutable interval index keyed by chromosome and strand.
#[derive(Debug, Clone)]
pub struct IntervalIndex<T> {
    groups: AHashMap<String, Stranded<T>>,
    len: usize,
}

impl<T> IntervalIndex<T> {
    /// Build the index from `(chromosome, strand, interval)` records.
    pub fn build<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (String, Strand, Interval<T>)>,
    {
        let mut pending: AHashMap<String, (Vec<Interval<T>>, Vec<Interval<T>>)> =
            AHashMap::new();
        let mut len = 0;

        for (chrom, strand, interval) in items {
            let entry = pending.entry(chrom).or_default();
            match strand {
                Strand::Positive => entry.0.push(interval),
                Strand::Negative => entry.1.push(interval),
            }
            len += 1;
        }

        let groups = pending
            .into_iter()
            .map(|(chrom, (positive, negative))| {
                (
                    chrom,
                    Stranded {
                        positive: Group::new(positive),
                        negative: Group::new(negative),
                    },
                )
            })
            .collect();

        IntervalIndex { groups, len }
    }

    /// Total number of indexed intervals.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn group(&self, chrom: &str, strand: Strand) -> Option<&Group<T>> {
        self.groups.get(chrom).map(|s| s.get(strand))
    }

    /// All intervals on `chrom`/`strand` overlapping `[start, end]`, in start order.
    pub fn overlapping<'a>(
        &'a self,
        chrom: &str,
        strand: Strand,
        start: u64,
        end: u64,
    ) -> impl Iterator<Item = &'a Interval<T>> + 'a {
        self.group(chrom, strand)
            .into_iter()
            .flat_map(move |g| g.overlapping(start, end))
    }

    /// Closest interval on `chrom`/`strand` to `point`.
    ///
    /// Returns `None` when nothing is indexed on that chromosome and strand;
    /// ties prefer the interval lying at or before the point.
    pub fn nearest(&self, chrom: &str, strand: Strand, point: u64) -> Option<Nearest<'_, T>> {
        self.group(chrom, strand).and_then(|g| g.nearest(point))
    }
}
