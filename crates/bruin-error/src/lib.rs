//! Structured, composable errors that render to deterministic JSON.
//!
//! An [`Error`] is assembled from [`options`], may carry other errors as
//! parents, and renders itself (and its whole parent chain) through
//! `Display`. [`Template`]s share defaults between many error sites, and
//! [`Error::recover`] turns a panic into a parent error.

pub mod codes;
mod error;
mod frame;
mod id;
pub mod internal;
mod kind;
pub mod options;
mod panic;
mod parent;
mod render;
mod sink;
mod template;
mod terminate;

// public exports
pub use bruin_metrics::{FMetric, Metric};
pub use error::Error;
pub use frame::{Frame, Stack};
pub use id::ErrorId;
pub use internal::InternalError;
pub use kind::ErrType;
pub use options::{ErrOption, FmtFlags};
pub use panic::{PanicAdapter, PanicPayload};
pub use parent::Parent;
pub use sink::OutputSink;
pub use template::Template;

pub type Result<T, E = Error> = std::result::Result<T, E>;
