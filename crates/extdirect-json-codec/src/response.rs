use serde::Serialize;
use serde_json::value::RawValue;

use crate::request::DirectRequest;
use crate::types::EXCEPTION_TYPE;

/// A successful reply, echoing the correlation fields of the request.
#[derive(Debug, Clone, Serialize)]
pub struct DirectResponse<'a, R: Serialize> {
    pub result: &'a R,
    pub tid: &'a RawValue,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub action: &'a str,
    pub method: &'a str,
}

impl<'a, R: Serialize> DirectResponse<'a, R> {
    pub fn new(request: &'a DirectRequest, tid: &'a RawValue, result: &'a R) -> Self {
        Self {
            result,
            tid,
            kind: &request.kind,
            action: &request.action,
            method: &request.method,
        }
    }
}

/// An error reply. Its `type` is always `"exception"` and `tid` may be null.
#[derive(Debug, Clone, Serialize)]
pub struct DirectException<'a> {
    pub message: String,
    pub tid: Option<&'a RawValue>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub action: &'a str,
    pub method: &'a str,
}

impl<'a> DirectException<'a> {
    pub fn new(request: &'a DirectRequest, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tid: request.tid.as_deref(),
            kind: EXCEPTION_TYPE,
            action: &request.action,
            method: &request.method,
        }
    }
}

/// Serialize one outbound message as a newline-terminated JSON document.
pub fn encode_message<T: Serialize + ?Sized>(message: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut body = serde_json::to_vec(message)?;
    body.push(b'\n');
    Ok(body)
}
