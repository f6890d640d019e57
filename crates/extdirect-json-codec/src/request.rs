use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::config::ParamsMode;
use crate::error::CodecError;
use crate::types::{self, NULL_PAYLOAD};

/// An Ext Direct call as received on the wire.
///
/// `data` and `tid` are kept as raw JSON so they are decoded lazily against
/// the handler's argument type and echoed back byte-for-byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectRequest {
    /// Service namespace the method belongs to
    #[serde(default, alias = "Action")]
    pub action: String,
    /// Bare method name
    #[serde(default, alias = "Method")]
    pub method: String,
    /// Positional arguments, `[arg]`, or `None` when absent or `null`
    #[serde(default, alias = "Data", skip_serializing_if = "Option::is_none")]
    pub data: Option<Box<RawValue>>,
    /// Correlation id; `None` marks a notification
    #[serde(default, alias = "Tid", alias = "TID")]
    pub tid: Option<Box<RawValue>>,
    #[serde(rename = "type", alias = "Type", default)]
    pub kind: String,
}

impl DirectRequest {
    pub fn new(action: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: method.into(),
            data: None,
            tid: None,
            kind: "rpc".to_string(),
        }
    }

    pub fn with_tid(mut self, tid: Box<RawValue>) -> Self {
        self.tid = Some(tid);
        self
    }

    pub fn with_data(mut self, data: Box<RawValue>) -> Self {
        self.data = Some(data);
        self
    }

    /// Check the envelope fields a dispatcher cannot do without.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.action.is_empty() {
            return Err(CodecError::malformed(
                "rpc: method request ill-formed: missing action field",
            ));
        }
        if self.method.is_empty() {
            return Err(CodecError::malformed(
                "rpc: method request ill-formed: missing method field",
            ));
        }
        Ok(())
    }

    /// The `"Action.method"` key used to look up the handler.
    pub fn dispatch_key(&self) -> String {
        types::dispatch_key(&self.action, &self.method)
    }

    /// A request without a correlation id expects no success body.
    pub fn is_notification(&self) -> bool {
        types::is_null(self.tid.as_deref())
    }

    /// Bind the single positional argument to `T`.
    ///
    /// A missing or `null` `data` binds `T` from JSON `null`; use `Option<T>`
    /// for targets that cannot represent null.
    pub fn positional_arg<T: DeserializeOwned>(&self, mode: ParamsMode) -> Result<T, CodecError> {
        match (self.data.as_deref(), mode) {
            (None, _) => decode_arg(NULL_PAYLOAD),
            (Some(data), _) if data.get() == NULL_PAYLOAD.get() => decode_arg(NULL_PAYLOAD),
            (Some(_), ParamsMode::Legacy) => Err(CodecError::missing_params()),
            (Some(data), ParamsMode::Positional) => unwrap_positional(data),
        }
    }
}

/// Unwrap `[arg, ...]` into `T`, using the first element.
///
/// An empty array binds `null`; trailing elements are ignored.
fn unwrap_positional<T: DeserializeOwned>(data: &RawValue) -> Result<T, CodecError> {
    let params: Vec<&RawValue> = serde_json::from_str(data.get())
        .map_err(|e| CodecError::params(format!("rpc: params must be a positional array: {e}")))?;

    if params.len() > 1 {
        tracing::debug!(
            count = params.len(),
            "Ignoring positional arguments beyond the first"
        );
    }

    decode_arg(params.first().copied().unwrap_or(NULL_PAYLOAD))
}

fn decode_arg<T: DeserializeOwned>(arg: &RawValue) -> Result<T, CodecError> {
    serde_json::from_str(arg.get()).map_err(|e| CodecError::params(format!("rpc: invalid params: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, from_str};

    fn raw(json: &str) -> Box<RawValue> {
        RawValue::from_string(json.to_string()).unwrap()
    }

    #[test]
    fn test_request_deserialization() {
        let json = r#"{"action":"Calc","method":"Add","data":[{"a":1}],"tid":7,"type":"rpc"}"#;
        let request: DirectRequest = from_str(json).unwrap();

        assert_eq!(request.action, "Calc");
        assert_eq!(request.method, "Add");
        assert_eq!(request.kind, "rpc");
        assert_eq!(request.tid.as_deref().map(RawValue::get), Some("7"));
        assert_eq!(request.data.as_deref().map(RawValue::get), Some(r#"[{"a":1}]"#));
        assert_eq!(request.dispatch_key(), "Calc.Add");
        assert!(!request.is_notification());
    }

    #[test]
    fn test_null_fields_are_absent() {
        let json = r#"{"action":"Calc","method":"Add","data":null,"tid":null,"type":"rpc"}"#;
        let request: DirectRequest = from_str(json).unwrap();

        assert!(request.data.is_none());
        assert!(request.tid.is_none());
        assert!(request.is_notification());
    }

    #[test]
    fn test_capitalised_keys() {
        let json = r#"{"Action":"Calc","Method":"Add","Data":[1],"TID":3,"Type":"rpc"}"#;
        let request: DirectRequest = from_str(json).unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.dispatch_key(), "Calc.Add");
        assert_eq!(request.tid.as_deref().map(RawValue::get), Some("3"));
        assert_eq!(request.kind, "rpc");
        assert_eq!(request.positional_arg::<i64>(ParamsMode::Positional).unwrap(), 1);
    }

    #[test]
    fn test_client_built_request_serialization() {
        let request = DirectRequest::new("Calc", "Add")
            .with_tid(raw("5"))
            .with_data(raw(r#"[{"a":1}]"#));

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"action":"Calc","method":"Add","data":[{"a":1}],"tid":5,"type":"rpc"}"#
        );

        let notification = DirectRequest::new("Calc", "Ping");
        assert_eq!(
            serde_json::to_string(&notification).unwrap(),
            r#"{"action":"Calc","method":"Ping","tid":null,"type":"rpc"}"#
        );
    }

    #[test]
    fn test_validate_envelope() {
        assert!(DirectRequest::new("Calc", "Add").validate().is_ok());

        let missing: DirectRequest = from_str(r#"{"method":"Add","tid":1}"#).unwrap();
        assert_eq!(
            missing.validate(),
            Err(CodecError::malformed(
                "rpc: method request ill-formed: missing action field"
            ))
        );

        let missing: DirectRequest = from_str(r#"{"action":"Calc","tid":1}"#).unwrap();
        assert!(matches!(missing.validate(), Err(CodecError::MalformedMessage(_))));
    }

    #[test]
    fn test_null_data_binds_null() {
        let request = DirectRequest::new("Calc", "Now");

        let value: Value = request.positional_arg(ParamsMode::Positional).unwrap();
        assert!(value.is_null());

        let unit: Option<i64> = request.positional_arg(ParamsMode::Legacy).unwrap();
        assert_eq!(unit, None);
    }

    #[test]
    fn test_positional_unwrap() {
        let request = DirectRequest::new("Calc", "Add").with_data(raw(r#"[{"a":1,"b":2}]"#));

        let args: Value = request.positional_arg(ParamsMode::Positional).unwrap();
        assert_eq!(args, serde_json::json!({"a": 1, "b": 2}));

        let request = DirectRequest::new("Calc", "Add").with_data(raw("[5, 6]"));
        let first: i64 = request.positional_arg(ParamsMode::Positional).unwrap();
        assert_eq!(first, 5);

        let request = DirectRequest::new("Calc", "Add").with_data(raw("[]"));
        let empty: Option<String> = request.positional_arg(ParamsMode::Positional).unwrap();
        assert_eq!(empty, None);
    }

    #[test]
    fn test_bare_scalar_is_params_error() {
        let request = DirectRequest::new("Calc", "Add").with_data(raw("42"));
        let result: Result<i64, _> = request.positional_arg(ParamsMode::Positional);
        assert!(matches!(result, Err(CodecError::Params(_))));
    }

    #[test]
    fn test_type_mismatch_is_params_error() {
        let request = DirectRequest::new("Calc", "Add").with_data(raw(r#"["three"]"#));
        let result: Result<i64, _> = request.positional_arg(ParamsMode::Positional);
        assert!(matches!(result, Err(CodecError::Params(_))));
    }

    #[test]
    fn test_legacy_mode_rejects_data() {
        let request = DirectRequest::new("Calc", "Add").with_data(raw("[1]"));
        let result: Result<i64, _> = request.positional_arg(ParamsMode::Legacy);
        assert_eq!(result, Err(CodecError::missing_params()));
    }
}
