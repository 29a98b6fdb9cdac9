//! Wire-protocol status codes, as plain integers for
//! [`with_code`](crate::options::with_code) and
//! [`with_exit_code`](crate::options::with_exit_code).
//!
//! ```rust
//! use bruin_error::{Error, codes};
//! use bruin_error::options::{with_code, with_exit_code};
//!
//! let err = Error::create([with_code(codes::grpc::NOT_FOUND), with_exit_code(codes::http::NOT_FOUND)]);
//! assert_eq!((err.code(), err.exit_code()), (Some(5), Some(404)));
//! ```

pub mod grpc;
pub mod http;
