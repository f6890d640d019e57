//! HTTP side of the codec: the response sink a session writes to, and the
//! mapping of codec errors onto transport-level failures.

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use http::{Response, StatusCode};
use http_body_util::Full;

use crate::error::CodecError;

/// Content type set on every body the codec writes.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// HTTP body type produced by [`HttpResponseWriter`]
pub type DirectBody = Full<Bytes>;

/// Destination for one encoded response: a header map and a body.
pub trait ResponseWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn write_body(&mut self, body: &[u8]);

    fn set_json_content_type(&mut self) {
        self.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    }
}

/// Buffers headers and body until the host turns them into a response.
#[derive(Debug, Default)]
pub struct HttpResponseWriter {
    headers: HeaderMap,
    body: BytesMut,
}

impl HttpResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// True when nothing was written, as for a notification.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.headers.is_empty()
    }

    pub fn into_response(self, status: StatusCode) -> Response<DirectBody> {
        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for HttpResponseWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_body(&mut self, body: &[u8]) {
        self.body.extend_from_slice(body);
    }
}

/// Map an error returned by a session to a plain-text response.
///
/// Decode failures are the caller's fault (400); encode failures and a
/// repeated write are server faults (500).
pub fn codec_error_response(err: &CodecError) -> Response<DirectBody> {
    let mut response = Response::new(Full::new(Bytes::from(err.to_string())));
    *response.status_mut() = if err.is_decode_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
