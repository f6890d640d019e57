//! # Ext Direct JSON-RPC Codec
//!
//! A request/response codec for the ExtJS "Direct" flavour of JSON-RPC. It
//! turns one HTTP request body into a dispatch key and a typed argument, and
//! turns the handler's result or error back into a response body.
//!
//! Routing, handler registration and the server loop belong to the host; the
//! codec plugs into them through the [`Codec`] and [`CodecRequest`] traits.
//!
//! ## Features
//! - `"Action.method"` dispatch keys
//! - Positional argument unwrapping (`data: [arg]`)
//! - Notifications (`tid: null`) get no success body, but errors are always reported
//! - Correlation ids echoed byte-for-byte
//! - `async` (default): collect `http_body::Body` request bodies directly

pub mod codec;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;
pub mod types;

pub mod prelude;

// Re-export main types
pub use codec::{Codec, CodecRequest, DirectCodec, DirectCodecBuilder};
pub use config::{CodecConfig, ParamsMode};
pub use error::CodecError;
pub use request::DirectRequest;
pub use response::{DirectException, DirectResponse};
pub use session::{DirectCodecRequest, SessionState};
pub use transport::{CONTENT_TYPE_JSON, HttpResponseWriter, ResponseWriter, codec_error_response};
pub use types::{EXCEPTION_TYPE, NULL_PAYLOAD};

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
