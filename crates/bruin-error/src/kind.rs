use std::borrow::Cow;
use std::fmt;

/// A coarse error category, e.g. `"Not Found"` or `"Panic Error"`.
///
/// Categories should be broad classes shared by many error sites; use the
/// message for the specifics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrType(Cow<'static, str>);

impl ErrType {
    /// Category attached to errors produced from a captured panic.
    pub const PANIC: ErrType = ErrType::new("Panic Error");

    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Build a category from a runtime string.
    pub fn owned(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ErrType {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ErrType {
    fn from(name: String) -> Self {
        Self::owned(name)
    }
}
