use serde_json::{json, Value};

use crate::error::NerveError;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &NerveError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

/// Pretty-print an envelope on stdout.
pub fn print(v: &Value) {
    match serde_json::to_string_pretty(v) {
        Ok(s) => println!("{s}"),
        Err(_) => println!("{v}"),
    }
}

pub fn print_success(data: Value) {
    print(&success(data));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_carries_code_and_message() {
        let v = error(&NerveError::no_active_session());
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "NO_ACTIVE_SESSION");
        assert_eq!(v["error"]["message"], "No active session");
    }
}
