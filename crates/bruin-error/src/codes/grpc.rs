//! gRPC status codes.

pub const OK: i64 = 0;
pub const CANCELLED: i64 = 1;
pub const UNKNOWN: i64 = 2;
pub const INVALID_ARGUMENT: i64 = 3;
pub const DEADLINE_EXCEEDED: i64 = 4;
pub const NOT_FOUND: i64 = 5;
pub const ALREADY_EXISTS: i64 = 6;
pub const PERMISSION_DENIED: i64 = 7;
pub const RESOURCE_EXHAUSTED: i64 = 8;
pub const FAILED_PRECONDITION: i64 = 9;
pub const ABORTED: i64 = 10;
pub const OUT_OF_RANGE: i64 = 11;
pub const UNIMPLEMENTED: i64 = 12;
pub const INTERNAL: i64 = 13;
pub const UNAVAILABLE: i64 = 14;
pub const DATA_LOSS: i64 = 15;
pub const UNAUTHENTICATED: i64 = 16;
