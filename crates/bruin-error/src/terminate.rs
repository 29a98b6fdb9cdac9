use std::panic;
use std::process;

use crate::Error;

impl Error {
    /// The status [`Error::panic`] and [`Error::exit`] report.
    ///
    /// A non-zero exit code wins, then a non-zero code, then `1`.
    pub fn termination_status(&self) -> i64 {
        match (self.exit_code, self.code) {
            (Some(status), _) if status != 0 => status,
            (_, Some(status)) if status != 0 => status,
            _ => 1,
        }
    }

    /// Unwind with the termination status as an `i64` panic payload,
    /// optionally printing the rendered error to the output sink first.
    ///
    /// ```rust
    /// use std::panic::{self, AssertUnwindSafe};
    /// use bruin_error::Error;
    /// use bruin_error::options::with_exit_code;
    ///
    /// let err = Error::create([with_exit_code(3)]);
    /// let payload = panic::catch_unwind(AssertUnwindSafe(|| err.panic(false))).unwrap_err();
    /// assert_eq!(payload.downcast_ref::<i64>(), Some(&3));
    /// ```
    pub fn panic(&self, print: bool) -> ! {
        let status = self.prepare_termination(print);
        panic::panic_any(status)
    }

    /// Like [`Error::panic`], but ends the process with the termination
    /// status. A status that does not fit an `i32` exits with `1`.
    pub fn exit(&self, print: bool) -> ! {
        let status = self.prepare_termination(print);
        process::exit(i32::try_from(status).unwrap_or(1))
    }

    fn prepare_termination(&self, print: bool) -> i64 {
        if print {
            if let Err(_fault) = self.output.write_line(&self.render()) {
                #[cfg(feature = "tracing")]
                tracing::warn!(target: "bruin_error", id = %self.id, error = %_fault, "failed to print error");
            }
        }

        let status = self.termination_status();
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "bruin_error", id = %self.id, status, "terminating");
        status
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::OutputSink;
    use crate::options::*;

    fn status_of(err: &Error) -> i64 {
        let payload = panic::catch_unwind(AssertUnwindSafe(|| err.panic(false))).unwrap_err();
        *payload.downcast_ref::<i64>().unwrap()
    }

    #[test]
    fn status_selection() {
        assert_eq!(status_of(&Error::create([with_exit_code(3), with_code(7)])), 3);
        assert_eq!(status_of(&Error::create([with_exit_code(0), with_code(7)])), 7);
        assert_eq!(status_of(&Error::create([with_code(7)])), 7);
        assert_eq!(status_of(&Error::create([with_code(0)])), 1);
        assert_eq!(status_of(&Error::create([])), 1);
    }

    #[test]
    fn print_writes_render_and_newline() {
        let buf = Arc::new(Mutex::new(Vec::<u8>::new()));
        let err = Error::create([
            with_code(1),
            with_output(OutputSink::shared(Arc::clone(&buf))),
            fmt_no_stack(true),
            fmt_no_id(true),
        ]);

        assert_eq!(status_of(&err), 1);
        assert!(buf.lock().unwrap().is_empty());

        let payload = panic::catch_unwind(AssertUnwindSafe(|| err.panic(true))).unwrap_err();
        assert_eq!(payload.downcast_ref::<i64>(), Some(&1));
        assert_eq!(String::from_utf8(buf.lock().unwrap().clone()).unwrap(), "{\"code\":1}\n");
    }

    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_print_still_terminates() {
        let err = Error::create([with_exit_code(9), with_output(OutputSink::new(Broken))]);
        let payload = panic::catch_unwind(AssertUnwindSafe(|| err.panic(true))).unwrap_err();
        assert_eq!(payload.downcast_ref::<i64>(), Some(&9));
    }
}
