/// Faults inside the library itself, as opposed to the errors it builds.
///
/// These only surface through [`crate::Error::try_render`]; the infallible
/// rendering paths escalate them to a panic.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    #[error("failed to get current working dir: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("failed to encode error as json: {0}")]
    Encode(#[from] serde_json::Error),
}
