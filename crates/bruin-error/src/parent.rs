use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::Error;

/// A causal predecessor of an [`Error`].
///
/// Parents are shared and read-only once attached: the same error may be the
/// parent of several others, and it is rendered as it stands at render time.
#[derive(Clone)]
pub enum Parent {
    /// A structured error, rendered with its own formatting flags.
    Error(Arc<Error>),
    /// Any other error, rendered as `{"msg": <its Display text>}`.
    Foreign(Arc<dyn StdError + Send + Sync>),
}

impl Parent {
    /// Wrap an arbitrary error. A boxed-up [`Error`] is recognised and kept
    /// structured.
    pub fn foreign<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from(Box::new(err) as Box<dyn StdError + Send + Sync>)
    }

    /// The structured error, if this parent is one.
    pub fn as_error(&self) -> Option<&Error> {
        match self {
            Self::Error(err) => Some(&**err),
            Self::Foreign(_) => None,
        }
    }

    pub fn as_std_error(&self) -> &(dyn StdError + 'static) {
        match self {
            Self::Error(err) => &**err,
            Self::Foreign(err) => &**err,
        }
    }
}

impl From<Error> for Parent {
    fn from(err: Error) -> Self {
        Self::Error(Arc::new(err))
    }
}

impl From<Arc<Error>> for Parent {
    fn from(err: Arc<Error>) -> Self {
        Self::Error(err)
    }
}

impl From<Box<dyn StdError + Send + Sync>> for Parent {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        match err.downcast::<Error>() {
            Ok(err) => Self::Error(Arc::from(err)),
            Err(other) => Self::Foreign(Arc::from(other)),
        }
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_std_error(), f)
    }
}

impl fmt::Debug for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(err) => f.debug_tuple("Error").field(err).finish(),
            Self::Foreign(err) => f.debug_tuple("Foreign").field(err).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::with_code;

    #[test]
    fn foreign_keeps_plain_errors_foreign() {
        let parent = Parent::foreign(std::io::Error::other("disk on fire"));
        assert!(parent.as_error().is_none());
        assert_eq!(parent.to_string(), "disk on fire");
    }

    #[test]
    fn foreign_recognises_structured_errors() {
        let parent = Parent::foreign(Error::create([with_code(7)]));
        assert_eq!(parent.as_error().and_then(Error::code), Some(7));
    }
}
