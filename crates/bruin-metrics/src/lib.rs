//! Named counters that can be attached to structured errors.
//!
//! Two flavours share the same surface:
//!
//! - [`Metric`] tracks an `i64`.
//! - [`FMetric`] tracks an `f64`.
//!
//! Both are updated through atomics, so a counter can be shared behind an
//! `Arc` between the code that bumps it and any number of errors that carry
//! it. Serializing a counter reads its value at that moment:
//!
//! ```rust
//! use bruin_metrics::Metric;
//!
//! let retries = Metric::new("retries");
//! retries.incr();
//! retries.add(2);
//! assert_eq!(retries.value(), 3);
//! assert_eq!(retries.to_string(), "[retries] 3");
//! ```

use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use serde::{Serialize, Serializer};

/// JSON projection shared by both counter kinds: `{"name": .., "value": ..}`.
#[derive(Serialize)]
struct View<'a, T> {
    name: &'a str,
    value: T,
}

/// An integer counter.
#[derive(Debug, Default)]
pub struct Metric {
    name: String,
    value: AtomicI64,
}

impl Metric {
    /// Create a counter starting at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AtomicI64::new(0),
        }
    }

    /// Add one.
    #[inline]
    pub fn incr(&self) {
        self.add(1);
    }

    /// Subtract one.
    #[inline]
    pub fn decr(&self) {
        self.add(-1);
    }

    /// Add an arbitrary (possibly negative) amount.
    #[inline]
    pub fn add(&self, delta: i64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Clone for Metric {
    /// Snapshot: the clone starts at the current value and then diverges.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value: AtomicI64::new(self.value()),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        View {
            name: &self.name,
            value: self.value(),
        }
        .serialize(serializer)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.name, self.value())
    }
}

/// Sum the values of every metric.
pub fn sum_metrics<'a, I>(metrics: I) -> i64
where
    I: IntoIterator<Item = &'a Metric>,
{
    metrics.into_iter().map(Metric::value).sum()
}

/// Keep the metrics that satisfy `keep`, preserving order.
pub fn filter_metrics<'a, I, F>(metrics: I, mut keep: F) -> Vec<&'a Metric>
where
    I: IntoIterator<Item = &'a Metric>,
    F: FnMut(&Metric) -> bool,
{
    metrics.into_iter().filter(|m| keep(*m)).collect()
}

/// A real-valued counter. The `f64` is stored as its bit pattern.
#[derive(Debug)]
pub struct FMetric {
    name: String,
    bits: AtomicU64,
}

impl FMetric {
    /// Create a counter starting at `0.0`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    #[inline]
    pub fn incr(&self) {
        self.add(1.0);
    }

    #[inline]
    pub fn decr(&self) {
        self.add(-1.0);
    }

    /// Add an arbitrary amount. Lock-free CAS loop on the bit pattern.
    pub fn add(&self, delta: f64) {
        // fetch_update only fails when the closure returns None.
        let _ = self
            .bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + delta).to_bits())
            });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for FMetric {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Clone for FMetric {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            bits: AtomicU64::new(self.bits.load(Ordering::Relaxed)),
        }
    }
}

impl Serialize for FMetric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        View {
            name: &self.name,
            value: self.value(),
        }
        .serialize(serializer)
    }
}

impl fmt::Display for FMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:.4}", self.name, self.value())
    }
}

/// Sum the values of every real-valued metric.
pub fn sum_fmetrics<'a, I>(metrics: I) -> f64
where
    I: IntoIterator<Item = &'a FMetric>,
{
    metrics.into_iter().map(FMetric::value).sum()
}

/// Keep the real-valued metrics that satisfy `keep`, preserving order.
pub fn filter_fmetrics<'a, I, F>(metrics: I, mut keep: F) -> Vec<&'a FMetric>
where
    I: IntoIterator<Item = &'a FMetric>,
    F: FnMut(&FMetric) -> bool,
{
    metrics.into_iter().filter(|m| keep(*m)).collect()
}
