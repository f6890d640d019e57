use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::Result;
use crate::codec::CodecRequest;
use crate::config::ParamsMode;
use crate::error::CodecError;
use crate::request::DirectRequest;
use crate::response::{DirectException, DirectResponse, encode_message};
use crate::transport::ResponseWriter;

/// Lifecycle of a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    ArgsDecoded,
    DecodeFailed,
    ResponseWritten,
}

/// Decodes and encodes exactly one Ext Direct call.
///
/// The decoded request and any decode failure share one slot: once it holds an
/// error, every later operation returns that error and writes nothing.
#[derive(Debug)]
pub struct DirectCodecRequest {
    request: std::result::Result<DirectRequest, CodecError>,
    params_mode: ParamsMode,
    state: SessionState,
}

impl DirectCodecRequest {
    pub fn new(request: std::result::Result<DirectRequest, CodecError>, params_mode: ParamsMode) -> Self {
        let state = match request {
            Ok(_) => SessionState::Created,
            Err(_) => SessionState::DecodeFailed,
        };
        Self {
            request,
            params_mode,
            state,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The decoded request, if decoding has not failed.
    pub fn request(&self) -> Option<&DirectRequest> {
        self.request.as_ref().ok()
    }

    pub fn is_notification(&self) -> bool {
        self.request().is_some_and(DirectRequest::is_notification)
    }

    fn fail(&mut self, err: CodecError) {
        self.request = Err(err);
        self.state = SessionState::DecodeFailed;
    }
}

impl CodecRequest for DirectCodecRequest {
    fn method(&self) -> Result<String> {
        self.request
            .as_ref()
            .map(DirectRequest::dispatch_key)
            .map_err(Clone::clone)
    }

    fn read_request<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bound = match &self.request {
            Ok(request) => request.positional_arg(self.params_mode),
            Err(err) => return Err(err.clone()),
        };

        match bound {
            Ok(args) => {
                if self.state == SessionState::Created {
                    self.state = SessionState::ArgsDecoded;
                }
                Ok(args)
            }
            Err(err) => {
                warn!("Failed to decode request params: {}", err);
                self.fail(err.clone());
                Err(err)
            }
        }
    }

    fn write_response<W, R, E>(&mut self, writer: &mut W, reply: std::result::Result<R, E>) -> Result<()>
    where
        W: ResponseWriter + ?Sized,
        R: Serialize,
        E: fmt::Display,
    {
        if self.state == SessionState::ResponseWritten {
            return Err(CodecError::ResponseAlreadyWritten);
        }
        let request = match &self.request {
            Ok(request) => request,
            Err(err) => return Err(err.clone()),
        };

        let body = match &reply {
            Err(method_err) => {
                debug!(method = %request.method, "Relaying handler error: {}", method_err);
                Some(encode_message(&DirectException::new(request, method_err.to_string())))
            }
            Ok(result) => match request.tid.as_deref() {
                Some(tid) if !request.is_notification() => {
                    Some(encode_message(&DirectResponse::new(request, tid, result)))
                }
                _ => {
                    debug!(method = %request.method, "Notification handled, no response body");
                    None
                }
            },
        };

        if let Some(body) = body {
            let body = body.map_err(|e| {
                error!("Failed to serialize Ext Direct response: {}", e);
                CodecError::Encode(e.to_string())
            })?;
            writer.set_json_content_type();
            writer.write_body(&body);
        }

        self.state = SessionState::ResponseWritten;
        Ok(())
    }
}
