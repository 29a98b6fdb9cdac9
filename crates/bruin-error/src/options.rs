//! Composable mutations applied to an [`Error`] in sequence.
//!
//! Scalar fields are last-write-wins, collections append. Nothing is
//! validated: an empty tag name or an empty label is stored as given.
//!
//! ```rust
//! use bruin_error::Error;
//! use bruin_error::options::{fmt_no_id, fmt_no_stack, with_code, with_labels};
//!
//! let err = Error::create([
//!     with_code(1),
//!     with_code(2),
//!     with_labels(["io", "retry"]),
//!     fmt_no_stack(true),
//!     fmt_no_id(true),
//! ]);
//! assert_eq!(err.render(), r#"{"labels":["io","retry"],"code":2}"#);
//! ```

use std::fmt;
use std::sync::Arc;

use bruin_metrics::{FMetric, Metric};
use serde_json::Value;

use crate::{ErrType, Error, OutputSink, Parent};

/// A single, replayable mutation of an [`Error`].
///
/// Options are cheap to clone and can be applied any number of times, which
/// is what lets a [`crate::Template`] hand the same defaults to every error it
/// produces.
#[derive(Clone)]
pub struct ErrOption(Arc<dyn Fn(&mut Error) + Send + Sync>);

impl ErrOption {
    /// Wrap an arbitrary mutation.
    pub fn new(f: impl Fn(&mut Error) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[inline]
    pub(crate) fn apply(&self, err: &mut Error) {
        (self.0)(err)
    }
}

impl fmt::Debug for ErrOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrOption(..)")
    }
}

/// Formatting switches. They only affect rendering and are never rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FmtFlags {
    /// Indent the JSON with two spaces.
    pub pretty: bool,
    /// Skip the stack (no frame is formatted).
    pub no_stack: bool,
    /// Skip the parents (they are not visited).
    pub no_parents: bool,
    pub no_msg: bool,
    pub no_id: bool,
}

/// Append a causal predecessor.
pub fn with_parent(parent: impl Into<Parent>) -> ErrOption {
    let parent = parent.into();
    ErrOption::new(move |e| e.parents.push(parent.clone()))
}

pub fn with_code(code: i64) -> ErrOption {
    ErrOption::new(move |e| e.code = Some(code))
}

/// The status a process should report when it terminates on this error.
pub fn with_exit_code(exit_code: i64) -> ErrOption {
    ErrOption::new(move |e| e.exit_code = Some(exit_code))
}

/// Set a tag, overwriting any previous value under `name`.
pub fn with_tag(name: impl Into<String>, value: impl Into<Value>) -> ErrOption {
    let name = name.into();
    let value = value.into();
    ErrOption::new(move |e| {
        e.tags.insert(name.clone(), value.clone());
    })
}

pub fn with_label(name: impl Into<String>) -> ErrOption {
    with_labels([name])
}

/// Add labels to the label set. Re-adding a label has no effect.
pub fn with_labels<I, S>(names: I) -> ErrOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    ErrOption::new(move |e| e.labels.extend(names.iter().cloned()))
}

pub fn with_metric(metric: Arc<Metric>) -> ErrOption {
    with_metrics([metric])
}

/// Attach counters. They render with whatever value they hold at render time.
pub fn with_metrics(metrics: impl IntoIterator<Item = Arc<Metric>>) -> ErrOption {
    let metrics: Vec<_> = metrics.into_iter().collect();
    ErrOption::new(move |e| e.metrics.extend(metrics.iter().cloned()))
}

pub fn with_fmetric(metric: Arc<FMetric>) -> ErrOption {
    with_fmetrics([metric])
}

pub fn with_fmetrics(metrics: impl IntoIterator<Item = Arc<FMetric>>) -> ErrOption {
    let metrics: Vec<_> = metrics.into_iter().collect();
    ErrOption::new(move |e| e.fmetrics.extend(metrics.iter().cloned()))
}

pub fn with_err_type(err_type: impl Into<ErrType>) -> ErrOption {
    let err_type = err_type.into();
    ErrOption::new(move |e| e.err_type = Some(err_type.clone()))
}

pub fn with_msg(msg: impl Into<String>) -> ErrOption {
    let msg = msg.into();
    ErrOption::new(move |e| e.msg = Some(msg.clone()))
}

/// Where [`Error::panic`] and [`Error::exit`] print. Defaults to stderr.
pub fn with_output(sink: OutputSink) -> ErrOption {
    ErrOption::new(move |e| e.output = sink.clone())
}

/// Replace all formatting flags at once.
pub fn with_fmt(flags: FmtFlags) -> ErrOption {
    ErrOption::new(move |e| e.fmt = flags)
}

pub fn fmt_pretty(on: bool) -> ErrOption {
    ErrOption::new(move |e| e.fmt.pretty = on)
}

pub fn fmt_no_stack(on: bool) -> ErrOption {
    ErrOption::new(move |e| e.fmt.no_stack = on)
}

pub fn fmt_no_parents(on: bool) -> ErrOption {
    ErrOption::new(move |e| e.fmt.no_parents = on)
}

pub fn fmt_no_msg(on: bool) -> ErrOption {
    ErrOption::new(move |e| e.fmt.no_msg = on)
}

pub fn fmt_no_id(on: bool) -> ErrOption {
    ErrOption::new(move |e| e.fmt.no_id = on)
}
