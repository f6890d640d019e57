use serde_json::value::RawValue;

/// Canonical `null` payload, used for a missing `data` field and for the
/// correlation id of a notification.
pub const NULL_PAYLOAD: &RawValue = RawValue::NULL;

/// `type` value carried by every error response.
pub const EXCEPTION_TYPE: &str = "exception";

/// Separator between `action` and `method` in a dispatch key.
pub const DISPATCH_SEPARATOR: char = '.';

/// Builds the `"Namespace.Method"` key a host uses to locate a handler.
pub fn dispatch_key(action: &str, method: &str) -> String {
    let mut key = String::with_capacity(action.len() + method.len() + 1);
    key.push_str(action);
    key.push(DISPATCH_SEPARATOR);
    key.push_str(method);
    key
}

/// True when a raw payload is absent or the literal `null`.
pub fn is_null(raw: Option<&RawValue>) -> bool {
    raw.is_none_or(|value| value.get() == NULL_PAYLOAD.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_payload() {
        assert_eq!(NULL_PAYLOAD.get(), "null");
        assert!(is_null(None));
        assert!(is_null(Some(NULL_PAYLOAD)));

        let one = RawValue::from_string("1".to_string()).unwrap();
        assert!(!is_null(Some(&one)));
    }

    #[test]
    fn test_dispatch_key() {
        assert_eq!(dispatch_key("Calc", "Add"), "Calc.Add");
        assert_eq!(dispatch_key("", ""), ".");
    }
}
