use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::Result;
use crate::config::{CodecConfig, ParamsMode};
use crate::error::CodecError;
use crate::request::DirectRequest;
use crate::session::DirectCodecRequest;
use crate::transport::ResponseWriter;

/// Factory half of the codec contract a host RPC server plugs into.
pub trait Codec: Send + Sync {
    type Request: CodecRequest;

    /// Decode one request body. Never fails: decode problems are captured by
    /// the returned request and surfaced by its operations.
    fn new_request<R: Read>(&self, body: R) -> Self::Request;
}

/// Per-call half of the codec contract.
///
/// A host calls `method` to route, `read_request` to obtain the argument and
/// `write_response` exactly once with the handler's outcome.
pub trait CodecRequest: Send {
    /// The dispatch key, in `"Service.Method"` form.
    fn method(&self) -> Result<String>;

    /// Decode the call's single positional argument.
    ///
    /// A missing or `null` `data` binds `T` from JSON `null`, so targets that
    /// cannot hold null (structs, integers) must be requested as `Option<T>`.
    fn read_request<T: DeserializeOwned>(&mut self) -> Result<T>;

    /// Encode the handler outcome onto `writer`.
    ///
    /// `Err` is the handler's own failure; it is relayed as an exception body.
    /// The returned error is a codec failure the host must map to a transport
    /// error itself.
    fn write_response<W, R, E>(&mut self, writer: &mut W, reply: std::result::Result<R, E>) -> Result<()>
    where
        W: ResponseWriter + ?Sized,
        R: Serialize,
        E: fmt::Display;
}

/// Ext Direct JSON codec.
#[derive(Debug, Clone, Default)]
pub struct DirectCodec {
    config: CodecConfig,
}

impl DirectCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> DirectCodecBuilder {
        DirectCodecBuilder::default()
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode an already-collected body.
    ///
    /// Only the first JSON value is read; anything after it is ignored.
    pub fn decode(&self, body: impl Read) -> DirectCodecRequest {
        let mut deserializer = serde_json::Deserializer::from_reader(body);
        let decoded = DirectRequest::deserialize(&mut deserializer)
            .map_err(CodecError::from)
            .and_then(|request| request.validate().map(|()| request));

        match &decoded {
            Ok(request) => debug!(
                action = %request.action,
                method = %request.method,
                notification = request.is_notification(),
                "Decoded Ext Direct request"
            ),
            Err(err) => warn!("Failed to decode Ext Direct request: {}", err),
        }

        DirectCodecRequest::new(decoded, self.config.params_mode)
    }

    /// Collect an HTTP body, bounded by `max_body_size`, and decode it.
    #[cfg(feature = "async")]
    pub async fn new_request_from_body<B>(&self, body: B) -> DirectCodecRequest
    where
        B: http_body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        use http_body_util::{BodyExt, Limited};

        match Limited::new(body, self.config.max_body_size).collect().await {
            Ok(collected) => {
                let bytes = collected.to_bytes();
                self.decode(bytes.as_ref())
            }
            Err(err) => {
                warn!("Failed to read request body: {}", err);
                DirectCodecRequest::new(
                    Err(CodecError::malformed(format!(
                        "rpc: failed to read request body: {err}"
                    ))),
                    self.config.params_mode,
                )
            }
        }
    }
}

impl Codec for DirectCodec {
    type Request = DirectCodecRequest;

    fn new_request<R: Read>(&self, body: R) -> Self::Request {
        self.decode(body)
    }
}

/// Builder for [`DirectCodec`]
#[derive(Debug, Default)]
pub struct DirectCodecBuilder {
    config: CodecConfig,
}

impl DirectCodecBuilder {
    pub fn params_mode(mut self, mode: ParamsMode) -> Self {
        self.config.params_mode = mode;
        self
    }

    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    pub fn build(self) -> DirectCodec {
        DirectCodec::with_config(self.config)
    }
}
