use std::panic::Location;

use crate::Error;
use crate::options::ErrOption;

/// A reusable bundle of default options shared by a family of error sites.
///
/// Templates are not error sites themselves: no stack is captured until
/// [`Template::create`], and then it is captured at the caller of `create`.
///
/// ```rust
/// use bruin_error::Template;
/// use bruin_error::options::{fmt_no_id, fmt_no_stack, with_code, with_err_type};
///
/// let not_found = Template::new([with_err_type("not found"), fmt_no_stack(true), fmt_no_id(true)]);
/// let err = not_found.create([with_code(404)]);
/// assert_eq!(err.render(), r#"{"errType":"not found","code":404}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Template {
    opts: Vec<ErrOption>,
}

impl Template {
    pub fn new<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = ErrOption>,
    {
        Self {
            opts: opts.into_iter().collect(),
        }
    }

    /// A child template: this template's options followed by `opts`.
    /// `self` is left untouched.
    pub fn derive<I>(&self, opts: I) -> Self
    where
        I: IntoIterator<Item = ErrOption>,
    {
        let mut child = self.opts.clone();
        child.extend(opts);
        Self { opts: child }
    }

    /// Append `other`'s options to this template, in place.
    ///
    /// Order matters: on conflicting scalar fields `other` wins.
    pub fn union(&mut self, other: &Template) {
        self.opts.extend(other.opts.iter().cloned());
    }

    /// Create an error from this template's options followed by `opts`.
    ///
    /// Call-site options are applied last, so they override the template's
    /// scalar defaults. The stack starts at the caller of this method.
    #[track_caller]
    pub fn create<I>(&self, opts: I) -> Error
    where
        I: IntoIterator<Item = ErrOption>,
    {
        let mut err = Error::assemble(self.opts.iter().cloned().chain(opts));
        err.recapture(Location::caller());
        err
    }

    pub fn options(&self) -> &[ErrOption] {
        &self.opts
    }
}
