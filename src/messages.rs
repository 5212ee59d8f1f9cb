//! Text bodies the relay composes itself: the operator diagnostic and the test ping.

use chrono::Local;
use serde_json::Value;

const SEPARATOR: &str = "---------------------------------";

fn local_time() -> String {
    Local::now().format("%d/%m/%Y, %H:%M:%S").to_string()
}

pub fn error_log(error: &Value, failed_recipient: &str) -> String {
    format!(
        "ERROR LOG FROM SERVER\n{}\nTime: {}\nError: {}\nFailed to send to: {}\nPlease check server configuration",
        SEPARATOR,
        local_time(),
        error,
        failed_recipient
    )
}

pub fn test_ping(receiving_number: &str) -> String {
    format!(
        "TEST MESSAGE - WhatsApp Integration Working!\n{}\nTime: {}\nConnection Status: SUCCESS\nReceiving Number: {}\nReady to send real inquiries!",
        SEPARATOR,
        local_time(),
        receiving_number
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_log_carries_error_and_recipient() {
        let text = error_log(&json!({"error": {"code": 190}}), "911111111111");

        assert!(text.starts_with("ERROR LOG FROM SERVER\n"));
        assert!(text.contains(r#"Error: {"error":{"code":190}}"#));
        assert!(text.contains("Failed to send to: 911111111111"));
    }

    #[test]
    fn error_log_quotes_local_messages() {
        let text = error_log(&json!("connection refused"), "911111111111");
        assert!(text.contains(r#"Error: "connection refused""#));
    }

    #[test]
    fn test_ping_names_the_receiver() {
        let text = test_ping("912222222222");

        assert!(text.starts_with("TEST MESSAGE"));
        assert!(text.contains("Receiving Number: 912222222222"));
        assert!(text.contains("Time: "));
    }
}
