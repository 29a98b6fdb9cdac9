//! Turning a panic into error-chain data.
//!
//! A protected region runs under [`std::panic::catch_unwind`]. When it
//! panics, the payload is classified, folded into a new [`Error`] of the
//! panic category, and attached as a parent of the protecting error. The
//! panic does not propagate any further.
//!
//! The process panic hook still runs, so the usual panic message is printed
//! unless the application installed its own hook.

use std::any::{Any, type_name};
use std::panic::{self, Location, UnwindSafe};

use serde_json::{Map, Value};

use crate::options::{ErrOption, with_err_type, with_exit_code, with_msg, with_parent, with_tag};
use crate::{ErrType, Error};

/// What a panic payload turned out to be.
///
/// Classification order is fixed: integers, then text, then everything else.
/// Integers are widened to `i64` without loss; one that does not fit is
/// classified as [`PanicPayload::Other`] with its decimal text as `value`.
#[derive(Debug, Clone, PartialEq)]
pub enum PanicPayload {
    /// A signed integer that fits an `i64`.
    Signed(i64),
    /// An unsigned integer no larger than `i64::MAX`.
    Unsigned(u64),
    /// `&'static str` or `String`, i.e. what `panic!` produces.
    Text(String),
    /// Anything else. `value` is a best-effort representation.
    Other { value: Value, type_name: &'static str },
}

macro_rules! widen {
    ($payload:expr, $variant:ident: $($ty:ty),+ $(,)?) => {
        $(
            if let Some(v) = $payload.downcast_ref::<$ty>() {
                return match i64::try_from(*v).ok() {
                    Some(code) => PanicPayload::$variant(code as _),
                    None => PanicPayload::out_of_range(v, type_name::<$ty>()),
                };
            }
        )+
    };
}

macro_rules! known {
    ($payload:expr, $($ty:ty => $to_value:expr),+ $(,)?) => {
        $(
            if let Some(v) = $payload.downcast_ref::<$ty>() {
                return PanicPayload::Other {
                    value: $to_value(v),
                    type_name: type_name::<$ty>(),
                };
            }
        )+
    };
}

impl PanicPayload {
    pub fn classify(payload: &(dyn Any + Send)) -> Self {
        widen!(payload, Signed: i8, i16, i32, i64, i128, isize);
        widen!(payload, Unsigned: u8, u16, u32, u64, u128, usize);

        if let Some(text) = payload.downcast_ref::<&'static str>() {
            return Self::Text((*text).to_owned());
        }
        if let Some(text) = payload.downcast_ref::<String>() {
            return Self::Text(text.clone());
        }

        known!(payload,
            bool => |v: &bool| Value::Bool(*v),
            f64 => |v: &f64| Value::from(*v),
            f32 => |v: &f32| Value::from(f64::from(*v)),
            char => |v: &char| Value::String(v.to_string()),
            () => |_: &()| Value::Null,
            Value => |v: &Value| v.clone(),
        );

        Self::Other {
            value: Value::Object(Map::new()),
            type_name: "unknown",
        }
    }

    /// An integer that does not fit an exit code keeps its exact decimal
    /// text on the tag path.
    fn out_of_range(v: &impl ToString, type_name: &'static str) -> Self {
        Self::Other {
            value: Value::String(v.to_string()),
            type_name,
        }
    }

    /// Short name of the branch taken, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Signed(_) => "signed",
            Self::Unsigned(_) => "unsigned",
            Self::Text(_) => "text",
            Self::Other { .. } => "other",
        }
    }

    /// The options that record this payload on an error.
    ///
    /// An `Unsigned` value above `i64::MAX` is recorded as tags, like any
    /// other integer too wide for an exit code.
    pub fn into_options(self) -> Vec<ErrOption> {
        match self {
            Self::Signed(code) => vec![with_exit_code(code)],
            Self::Unsigned(code) => match i64::try_from(code) {
                Ok(code) => vec![with_exit_code(code)],
                Err(_) => Self::out_of_range(&code, type_name::<u64>()).into_options(),
            },
            Self::Text(msg) => vec![with_msg(msg)],
            Self::Other { value, type_name } => {
                vec![with_tag("value", value), with_tag("type", type_name)]
            }
        }
    }
}

/// Catches panics and records them as parents of an [`Error`].
#[derive(Debug, Clone)]
pub struct PanicAdapter {
    category: ErrType,
    opts: Vec<ErrOption>,
}

impl PanicAdapter {
    /// `opts` are applied to every error built from a captured panic.
    pub fn new<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = ErrOption>,
    {
        Self {
            category: ErrType::PANIC,
            opts: opts.into_iter().collect(),
        }
    }

    /// Use a category other than [`ErrType::PANIC`].
    pub fn category(mut self, category: ErrType) -> Self {
        self.category = category;
        self
    }

    /// Run `f`. Its value comes back as `Some`; a panic is absorbed into a
    /// new parent of `target` and yields `None`.
    #[track_caller]
    pub fn run<F, R>(&self, target: &mut Error, f: F) -> Option<R>
    where
        F: FnOnce() -> R + UnwindSafe,
    {
        let site = Location::caller();
        match panic::catch_unwind(f) {
            Ok(value) => Some(value),
            Err(payload) => {
                let parent = self.absorb_at(&*payload, site);
                target.add([with_parent(parent)]);
                None
            }
        }
    }

    /// Build the error for a payload obtained elsewhere, e.g. from
    /// `JoinHandle::join`.
    #[track_caller]
    pub fn absorb(&self, payload: &(dyn Any + Send)) -> Error {
        self.absorb_at(payload, Location::caller())
    }

    fn absorb_at(&self, payload: &(dyn Any + Send), site: &'static Location<'static>) -> Error {
        let classified = PanicPayload::classify(payload);

        #[cfg(feature = "tracing")]
        tracing::warn!(
            target: "bruin_error",
            kind = classified.kind(),
            file = site.file(),
            line = site.line(),
            "captured panic"
        );

        let mut err = Error::assemble(self.opts.iter().cloned());
        err.add([with_err_type(self.category.clone())]);
        err.add(classified.into_options());
        err.recapture(site);
        err
    }
}

impl Error {
    /// Run `f`, turning a panic inside it into a new parent of `self`.
    ///
    /// `opts` configure the parent built from the panic; it always gets the
    /// [`ErrType::PANIC`] category.
    ///
    /// ```rust
    /// use bruin_error::Error;
    /// use bruin_error::options::{fmt_no_id, fmt_no_stack};
    ///
    /// let mut err = Error::create([fmt_no_stack(true), fmt_no_id(true)]);
    /// let out: Option<()> = err.recover([fmt_no_stack(true), fmt_no_id(true)], || panic!("boom"));
    /// assert!(out.is_none());
    /// assert_eq!(err.render(), r#"{"parents":[{"errType":"Panic Error","msg":"boom"}]}"#);
    /// ```
    #[track_caller]
    pub fn recover<I, F, R>(&mut self, opts: I, f: F) -> Option<R>
    where
        I: IntoIterator<Item = ErrOption>,
        F: FnOnce() -> R + UnwindSafe,
    {
        PanicAdapter::new(opts).run(self, f)
    }
}

#[cfg(test)]
mod tests {
    use std::panic::panic_any;

    use super::*;
    use crate::options::{fmt_no_id, fmt_no_stack};

    fn quiet() -> [ErrOption; 2] {
        [fmt_no_stack(true), fmt_no_id(true)]
    }

    fn recovered<P: Any + Send + UnwindSafe>(payload: P) -> String {
        let mut err = Error::create(quiet());
        let out: Option<()> = err.recover(quiet(), move || panic_any(payload));
        assert!(out.is_none());
        err.render()
    }

    #[test]
    fn integers_become_exit_codes() {
        assert_eq!(recovered(1i32), r#"{"parents":[{"errType":"Panic Error","exitCode":1}]}"#);
        assert_eq!(recovered(2u64), r#"{"parents":[{"errType":"Panic Error","exitCode":2}]}"#);
        assert_eq!(recovered(-7i8), r#"{"parents":[{"errType":"Panic Error","exitCode":-7}]}"#);
        assert_eq!(recovered(9usize), r#"{"parents":[{"errType":"Panic Error","exitCode":9}]}"#);
    }

    #[test]
    fn text_becomes_message() {
        assert_eq!(recovered("panicking"), r#"{"parents":[{"errType":"Panic Error","msg":"panicking"}]}"#);
        assert_eq!(
            recovered(String::from("owned")),
            r#"{"parents":[{"errType":"Panic Error","msg":"owned"}]}"#
        );
    }

    #[test]
    fn formatted_panic_message() {
        let mut err = Error::create(quiet());
        let n = 3;
        let out: Option<()> = err.recover(quiet(), move || panic!("failed after {n} tries"));
        assert!(out.is_none());
        assert_eq!(err.parents()[0].as_error().and_then(Error::msg), Some("failed after 3 tries"));
    }

    #[test]
    fn anything_else_becomes_tags() {
        assert_eq!(
            recovered(true),
            r#"{"parents":[{"errType":"Panic Error","tags":{"type":"bool","value":true}}]}"#
        );
        assert_eq!(
            recovered(1.5f64),
            r#"{"parents":[{"errType":"Panic Error","tags":{"type":"f64","value":1.5}}]}"#
        );

        struct Opaque {
            _flag: bool,
        }
        assert_eq!(
            recovered(Opaque { _flag: true }),
            r#"{"parents":[{"errType":"Panic Error","tags":{"type":"unknown","value":{}}}]}"#
        );
    }

    #[test]
    fn classification_order() {
        assert_eq!(PanicPayload::classify(&5u8), PanicPayload::Unsigned(5));
        assert_eq!(PanicPayload::classify(&-5i64), PanicPayload::Signed(-5));
        assert_eq!(PanicPayload::classify(&"x"), PanicPayload::Text("x".into()));
        assert_eq!(PanicPayload::classify(&'c').kind(), "other");
        assert_eq!(PanicPayload::classify(&(1i128 << 40)), PanicPayload::Signed(1 << 40));
        assert_eq!(PanicPayload::classify(&(u128::from(u32::MAX))), PanicPayload::Unsigned(4294967295));
    }

    #[test]
    fn wide_integers_keep_their_value() {
        assert_eq!(
            PanicPayload::classify(&((1i128 << 64) + 5)),
            PanicPayload::Other {
                value: Value::String("18446744073709551621".into()),
                type_name: "i128",
            }
        );
        assert_eq!(
            PanicPayload::classify(&u64::MAX),
            PanicPayload::Other {
                value: Value::String(u64::MAX.to_string()),
                type_name: "u64",
            }
        );
        assert_eq!(
            recovered((1i128 << 64) + 5),
            r#"{"parents":[{"errType":"Panic Error","tags":{"type":"i128","value":"18446744073709551621"}}]}"#
        );
        assert_eq!(
            recovered(i64::MIN),
            format!(r#"{{"parents":[{{"errType":"Panic Error","exitCode":{}}}]}}"#, i64::MIN)
        );
    }

    #[test]
    fn oversized_unsigned_variant_goes_to_tags() {
        let err = Error::create(quiet().into_iter().chain(PanicPayload::Unsigned(u64::MAX).into_options()));
        assert_eq!(err.exit_code(), None);
        assert_eq!(err.get_tag("type"), Some(&Value::from("u64")));
        assert_eq!(err.get_tag("value"), Some(&Value::from(u64::MAX.to_string())));
    }

    #[test]
    fn normal_return_is_untouched() {
        let mut err = Error::create(quiet());
        let out = err.recover(quiet(), || 41 + 1);
        assert_eq!(out, Some(42));
        assert!(err.parents().is_empty());
        assert_eq!(err.render(), "{}");
    }

    #[test]
    fn adapter_options_and_category() {
        const CRASH: ErrType = ErrType::new("Crash");
        let adapter = PanicAdapter::new(quiet().into_iter().chain([with_err_type("ignored")]))
            .category(CRASH);
        let mut err = Error::create(quiet());

        let out: Option<()> = adapter.run(&mut err, || panic_any(4i32));
        assert!(out.is_none());
        let out: Option<()> = adapter.run(&mut err, || panic_any("again"));
        assert!(out.is_none());

        assert_eq!(
            err.render(),
            r#"{"parents":[{"errType":"Crash","exitCode":4},{"errType":"Crash","msg":"again"}]}"#
        );
    }

    #[test]
    fn panic_parent_stack_starts_at_recover() {
        let mut err = Error::create(quiet());
        let (_, line): (Option<()>, u32) = (err.recover([], || panic_any(0u8)), line!());
        let parent = err.parents()[0].as_error().unwrap();
        assert_eq!(parent.stack().frames()[0].line(), line);
    }

    #[test]
    fn absorb_join_payload() {
        let payload = std::thread::spawn(|| -> u8 { panic_any(3u16) }).join().unwrap_err();
        let err = PanicAdapter::new(quiet()).absorb(&*payload);
        assert_eq!(err.render(), r#"{"errType":"Panic Error","exitCode":3}"#);
    }
}
