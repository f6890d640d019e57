use thiserror::Error;

/// Message used when a request carries `data` in legacy params mode.
pub const MISSING_PARAMS_MESSAGE: &str = "rpc: method request ill-formed: missing params field";

/// Errors produced by the codec itself.
///
/// Dispatch failures raised by a handler are not represented here: they are
/// relayed to the caller as an exception body. A `CodecError` is always
/// returned to the host, which maps it to a transport-level failure.
///
/// The type is `Clone` because a session captures at most one error and hands
/// the same value back from every later operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The body was not valid JSON, could not be read, or lacks `action`/`method`.
    #[error("{0}")]
    MalformedMessage(String),

    /// The `data` payload does not match the positional-array shape or the target type.
    #[error("{0}")]
    Params(String),

    /// The handler's reply could not be serialized.
    #[error("rpc: failed to encode response: {0}")]
    Encode(String),

    #[error("rpc: response already written for this request")]
    ResponseAlreadyWritten,
}

impl CodecError {
    pub fn malformed(message: impl Into<String>) -> Self {
        CodecError::MalformedMessage(message.into())
    }

    pub fn params(message: impl Into<String>) -> Self {
        CodecError::Params(message.into())
    }

    pub fn missing_params() -> Self {
        CodecError::Params(MISSING_PARAMS_MESSAGE.to_string())
    }

    /// True for the two kinds captured by a session and replayed by later calls.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            CodecError::MalformedMessage(_) | CodecError::Params(_)
        )
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::MalformedMessage(err.to_string())
    }
}
