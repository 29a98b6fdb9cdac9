use std::collections::{BTreeMap, BTreeSet};
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use bruin_metrics::{FMetric, Metric};
use serde_json::Value;

use crate::options::{ErrOption, FmtFlags, with_msg, with_parent};
use crate::{ErrType, ErrorId, OutputSink, Parent, Stack};

/// A structured error: identity, classification, free-form tags and labels,
/// attached counters, causal parents and the stack of its construction site.
///
/// Built from [`ErrOption`]s and rendered as JSON by `Display`:
///
/// ```rust
/// use bruin_error::Error;
/// use bruin_error::options::{fmt_no_id, fmt_no_stack, with_code, with_exit_code, with_parent};
///
/// let cause = Error::create([with_code(1), fmt_no_stack(true), fmt_no_id(true)]);
/// let err = Error::create([
///     with_parent(cause),
///     with_exit_code(400),
///     fmt_no_stack(true),
///     fmt_no_id(true),
/// ]);
/// assert_eq!(err.to_string(), r#"{"parents":[{"code":1}],"exitCode":400}"#);
/// ```
///
/// # Sharing
///
/// Parents are held behind `Arc` and treated as read-only once attached.
/// There is no internal locking: mutating an error from several threads at
/// once is the caller's problem.
pub struct Error {
    pub(crate) id: ErrorId,
    pub(crate) parents: Vec<Parent>,
    pub(crate) err_type: Option<ErrType>,
    pub(crate) tags: BTreeMap<String, Value>,
    pub(crate) labels: BTreeSet<String>,
    pub(crate) metrics: Vec<Arc<Metric>>,
    pub(crate) fmetrics: Vec<Arc<FMetric>>,
    pub(crate) msg: Option<String>,
    pub(crate) code: Option<i64>,
    pub(crate) exit_code: Option<i64>,
    pub(crate) stack: Stack,
    pub(crate) fmt: FmtFlags,
    pub(crate) output: OutputSink,
}

impl Error {
    /// Create an error with a fresh id and the caller's stack, then apply
    /// `opts` in order.
    #[track_caller]
    pub fn create<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = ErrOption>,
    {
        let mut err = Self::assemble(opts);
        err.recapture(Location::caller());
        err
    }

    /// Create an error whose first parent is `cause`, then apply `opts`.
    ///
    /// A `cause` that is itself an [`Error`] stays structured.
    #[track_caller]
    pub fn wrap<E, I>(cause: E, opts: I) -> Self
    where
        E: StdError + Send + Sync + 'static,
        I: IntoIterator<Item = ErrOption>,
    {
        let mut err = Self::assemble(std::iter::once(with_parent(Parent::foreign(cause))).chain(opts));
        err.recapture(Location::caller());
        err
    }

    /// Everything but the stack.
    pub(crate) fn assemble<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = ErrOption>,
    {
        let mut err = Self {
            id: ErrorId::generate(),
            parents: Vec::new(),
            err_type: None,
            tags: BTreeMap::new(),
            labels: BTreeSet::new(),
            metrics: Vec::new(),
            fmetrics: Vec::new(),
            msg: None,
            code: None,
            exit_code: None,
            stack: Stack::default(),
            fmt: FmtFlags::default(),
            output: OutputSink::default(),
        };
        err.add(opts);
        err
    }

    /// Replace the stack with one starting at `site`.
    pub(crate) fn recapture(&mut self, site: &'static Location<'static>) {
        self.stack = Stack::capture_from(site);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "bruin_error",
            id = %self.id,
            file = site.file(),
            line = site.line(),
            "error created"
        );
    }

    /// Apply more options in place.
    pub fn add<I>(&mut self, opts: I) -> &mut Self
    where
        I: IntoIterator<Item = ErrOption>,
    {
        for opt in opts {
            opt.apply(self);
        }
        self
    }
}

impl Error {
    /// True if `err` is an [`Error`].
    pub fn is_structured(err: &(dyn StdError + 'static)) -> bool {
        err.is::<Error>()
    }

    /// True if `err` belongs to `kind`.
    ///
    /// An [`Error`] is compared by its error type. Any other error is
    /// compared by its `Display` text, which is coarse but never panics.
    pub fn is_kind(err: &(dyn StdError + 'static), kind: &ErrType) -> bool {
        match err.downcast_ref::<Error>() {
            Some(err) => err.err_type.as_ref() == Some(kind),
            None => err.to_string() == kind.as_str(),
        }
    }

    /// Turn any boxed error into an [`Error`].
    ///
    /// The flag is `true` when a conversion took place, i.e. `err` was not
    /// already an [`Error`]; in that case its text becomes the message.
    #[track_caller]
    pub fn convert(err: Box<dyn StdError + Send + Sync>) -> (Self, bool) {
        match err.downcast::<Error>() {
            Ok(err) => (*err, false),
            Err(other) => {
                let mut err = Self::assemble([with_msg(other.to_string())]);
                err.recapture(Location::caller());
                (err, true)
            }
        }
    }
}

impl Error {
    pub fn id(&self) -> &ErrorId {
        &self.id
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// The value stored under `name`, if any.
    pub fn get_tag(&self, name: &str) -> Option<&Value> {
        self.tags.get(name)
    }

    pub fn tags(&self) -> &BTreeMap<String, Value> {
        &self.tags
    }

    /// Labels in ascending order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn parents(&self) -> &[Parent] {
        &self.parents
    }

    pub fn err_type(&self) -> Option<&ErrType> {
        self.err_type.as_ref()
    }

    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }

    pub fn exit_code(&self) -> Option<i64> {
        self.exit_code
    }

    pub fn metrics(&self) -> &[Arc<Metric>] {
        &self.metrics
    }

    pub fn fmetrics(&self) -> &[Arc<FMetric>] {
        &self.fmetrics
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn fmt_flags(&self) -> FmtFlags {
        self.fmt
    }
}

impl StdError for Error {
    /// The earliest attached parent.
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.parents.first().map(Parent::as_std_error)
    }
}

impl fmt::Display for Error {
    /// The JSON rendering; see [`Error::render`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("id", &self.id)
            .field("parents", &self.parents)
            .field("err_type", &self.err_type)
            .field("tags", &self.tags)
            .field("labels", &self.labels)
            .field("metrics", &self.metrics)
            .field("fmetrics", &self.fmetrics)
            .field("msg", &self.msg)
            .field("code", &self.code)
            .field("exit_code", &self.exit_code)
            .field("stack", &self.stack)
            .field("fmt", &self.fmt)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::*;

    #[derive(Debug)]
    struct NotFound;

    impl fmt::Display for NotFound {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("not found")
        }
    }

    impl StdError for NotFound {}

    #[test]
    fn create_assigns_id_and_stack() {
        let (err, line) = (Error::create([]), line!());
        assert_eq!(err.id().as_str().len(), ErrorId::LEN);
        let site = &err.stack().frames()[0];
        assert_eq!(site.line(), line);
        assert!(site.file().ends_with("error.rs"));
    }

    #[test]
    fn ids_are_unique_per_construction() {
        let a = Error::create([]);
        let b = Error::create([]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn wrap_attaches_cause_first() {
        let (err, line) = (
            Error::wrap(NotFound, [with_parent(Error::create([with_code(2)]))]),
            line!() - 1,
        );
        assert_eq!(err.parents().len(), 2);
        assert!(err.parents()[0].as_error().is_none());
        assert_eq!(err.parents()[1].as_error().and_then(Error::code), Some(2));
        assert_eq!(err.source().map(|s| s.to_string()), Some("not found".to_string()));
        assert_eq!(err.stack().frames()[0].line(), line);
    }

    #[test]
    fn wrap_keeps_structured_causes_structured() {
        let cause = Error::create([with_code(9)]);
        let err = Error::wrap(cause, []);
        assert_eq!(err.parents()[0].as_error().and_then(Error::code), Some(9));
    }

    #[test]
    fn add_mutates_in_place_and_chains() {
        let mut err = Error::create([fmt_no_stack(true), fmt_no_id(true)]);
        let id = err.id().clone();
        err.add([with_code(1)]).add([with_labels(["test", "success"])]);
        assert_eq!(err.id(), &id);
        assert_eq!(err.render(), r#"{"labels":["success","test"],"code":1}"#);
    }

    #[test]
    fn readers_on_empty_error() {
        let err = Error::create([]);
        assert!(!err.has_label("nil"));
        assert!(!err.has_tag("nil"));
        assert_eq!(err.get_tag("nil"), None);
        assert_eq!(err.labels().count(), 0);
        assert!(err.parents().is_empty());
        assert!(err.source().is_none());
    }

    #[test]
    fn labels_and_tags_lookup() {
        let err = Error::create([
            with_labels(["b", "a"]),
            with_label("b"),
            with_tag("x", 1),
            with_tag("x", 2),
        ]);
        assert!(err.has_label("a"));
        assert!(!err.has_label("c"));
        assert_eq!(err.labels().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(err.get_tag("x"), Some(&Value::from(2)));
        assert!(!err.has_tag("y"));
    }

    #[test]
    fn is_kind_checks_type_or_text() {
        const NOT_FOUND: ErrType = ErrType::new("not found");
        let structured = Error::create([with_err_type(NOT_FOUND)]);
        let untyped = Error::create([with_msg("not found")]);

        assert!(Error::is_kind(&structured, &NOT_FOUND));
        assert!(!Error::is_kind(&structured, &ErrType::PANIC));
        // A structured error never falls back to its text.
        assert!(!Error::is_kind(&untyped, &NOT_FOUND));
        assert!(Error::is_kind(&NotFound, &NOT_FOUND));
        assert!(!Error::is_kind(&std::io::Error::other("gone"), &NOT_FOUND));
    }

    #[test]
    fn convert_reports_whether_it_converted() {
        let (err, converted) = Error::convert(Box::new(Error::create([with_code(5)])));
        assert!(!converted);
        assert_eq!(err.code(), Some(5));

        let (err, converted) = Error::convert(Box::new(NotFound));
        assert!(converted);
        assert_eq!(err.msg(), Some("not found"));
        assert_eq!(err.id().as_str().len(), ErrorId::LEN);
    }

    #[test]
    fn is_structured() {
        assert!(Error::is_structured(&Error::create([])));
        assert!(!Error::is_structured(&NotFound));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
