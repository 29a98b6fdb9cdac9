//! HTTP client (4xx) and server (5xx) error statuses.

// 4xx
pub const BAD_REQUEST: i64 = 400;
pub const UNAUTHORIZED: i64 = 401;
pub const PAYMENT_REQUIRED: i64 = 402;
pub const FORBIDDEN: i64 = 403;
pub const NOT_FOUND: i64 = 404;
pub const METHOD_NOT_ALLOWED: i64 = 405;
pub const NOT_ACCEPTABLE: i64 = 406;
pub const PROXY_AUTHENTICATION_REQUIRED: i64 = 407;
pub const REQUEST_TIMEOUT: i64 = 408;
pub const CONFLICT: i64 = 409;
pub const GONE: i64 = 410;
pub const LENGTH_REQUIRED: i64 = 411;
pub const PRECONDITION_FAILED: i64 = 412;
pub const PAYLOAD_TOO_LARGE: i64 = 413;
pub const URI_TOO_LONG: i64 = 414;
pub const UNSUPPORTED_MEDIA_TYPE: i64 = 415;
pub const RANGE_NOT_SATISFIABLE: i64 = 416;
pub const EXPECTATION_FAILED: i64 = 417;
pub const IM_A_TEAPOT: i64 = 418;
pub const MISDIRECTED_REQUEST: i64 = 421;
pub const UNPROCESSABLE_ENTITY: i64 = 422;
pub const LOCKED: i64 = 423;
pub const FAILED_DEPENDENCY: i64 = 424;
pub const TOO_EARLY: i64 = 425;
pub const UPGRADE_REQUIRED: i64 = 426;
pub const PRECONDITION_REQUIRED: i64 = 428;
pub const TOO_MANY_REQUESTS: i64 = 429;
pub const REQUEST_HEADER_FIELDS_TOO_LARGE: i64 = 431;
pub const UNAVAILABLE_FOR_LEGAL_REASONS: i64 = 451;

// 5xx
pub const INTERNAL_SERVER_ERROR: i64 = 500;
pub const NOT_IMPLEMENTED: i64 = 501;
pub const BAD_GATEWAY: i64 = 502;
pub const SERVICE_UNAVAILABLE: i64 = 503;
pub const GATEWAY_TIMEOUT: i64 = 504;
pub const HTTP_VERSION_NOT_SUPPORTED: i64 = 505;
pub const VARIANT_ALSO_NEGOTIATES: i64 = 506;
pub const INSUFFICIENT_STORAGE: i64 = 507;
pub const LOOP_DETECTED: i64 = 508;
pub const NOT_EXTENDED: i64 = 510;
pub const NETWORK_AUTHENTICATION_REQUIRED: i64 = 511;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_and_payload_are_distinct() {
        assert_eq!(PRECONDITION_FAILED, 412);
        assert_eq!(PAYLOAD_TOO_LARGE, 413);
    }
}
