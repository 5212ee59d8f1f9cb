use log::warn;

pub const PHONE_NUMBER_ID_UNSET: &str = "YOUR_PHONE_NUMBER_ID";
pub const ACCESS_TOKEN_UNSET: &str = "YOUR_ACCESS_TOKEN";
pub const RECIPIENT_PHONE_UNSET: &str = "YOUR_RECIPIENT_PHONE";
pub const TEST_PHONE_UNSET: &str = "YOUR_TEST_PHONE";

pub const DEFAULT_API_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v17.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Process-wide settings, read once at startup and never mutated afterwards.
///
/// Values that were never provided keep a literal placeholder string so the
/// handlers can tell "unset" apart from "set to something wrong".
#[derive(Debug, Clone)]
pub struct Config {
    pub phone_number_id: String,
    pub access_token: String,
    pub recipient_phone: String,
    pub test_phone: String,
    pub send_error_logs: bool,
    pub port: u16,
    pub api_url: String,
    pub api_version: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, fallback: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            phone_number_id: or("PHONE_NUMBER_ID", PHONE_NUMBER_ID_UNSET),
            access_token: or("ACCESS_TOKEN", ACCESS_TOKEN_UNSET),
            recipient_phone: or("RECIPIENT_PHONE", RECIPIENT_PHONE_UNSET),
            test_phone: or("TEST_PHONE", TEST_PHONE_UNSET),
            send_error_logs: lookup("SEND_ERROR_LOGS").as_deref() == Some("true"),
            port,
            api_url: or("WHATSAPP_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            api_version: or("WHATSAPP_API_VERSION", DEFAULT_API_VERSION),
        }
    }

    pub fn phone_number_id_set(&self) -> bool {
        self.phone_number_id != PHONE_NUMBER_ID_UNSET
    }

    pub fn access_token_set(&self) -> bool {
        self.access_token != ACCESS_TOKEN_UNSET
    }

    pub fn test_phone_set(&self) -> bool {
        self.test_phone != TEST_PHONE_UNSET
    }

    pub fn recipient_phone_set(&self) -> bool {
        self.recipient_phone != RECIPIENT_PHONE_UNSET
    }

    /// Both provider credentials are present.
    pub fn credentials_set(&self) -> bool {
        self.phone_number_id_set() && self.access_token_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_values_fall_back_to_placeholders() {
        let config = config_from(&[]);

        assert_eq!(config.phone_number_id, PHONE_NUMBER_ID_UNSET);
        assert_eq!(config.access_token, ACCESS_TOKEN_UNSET);
        assert_eq!(config.test_phone, TEST_PHONE_UNSET);
        assert_eq!(config.recipient_phone, RECIPIENT_PHONE_UNSET);
        assert!(!config.send_error_logs);
        assert_eq!(config.port, 5000);
        assert_eq!(config.api_url, "https://graph.facebook.com");
        assert_eq!(config.api_version, "v17.0");
        assert!(!config.credentials_set());
        assert!(!config.test_phone_set());
    }

    #[test]
    fn provided_values_are_used() {
        let config = config_from(&[
            ("PHONE_NUMBER_ID", "123456789"),
            ("ACCESS_TOKEN", "EAAB-token"),
            ("RECIPIENT_PHONE", "911111111111"),
            ("TEST_PHONE", "912222222222"),
            ("SEND_ERROR_LOGS", "true"),
            ("PORT", "8080"),
            ("WHATSAPP_API_URL", "http://127.0.0.1:9999/"),
        ]);

        assert!(config.credentials_set());
        assert!(config.test_phone_set());
        assert!(config.recipient_phone_set());
        assert!(config.send_error_logs);
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn error_logs_need_exact_true() {
        assert!(!config_from(&[("SEND_ERROR_LOGS", "TRUE")]).send_error_logs);
        assert!(!config_from(&[("SEND_ERROR_LOGS", "1")]).send_error_logs);
        assert!(!config_from(&[("SEND_ERROR_LOGS", "false")]).send_error_logs);
    }

    #[test]
    fn invalid_port_uses_default() {
        assert_eq!(config_from(&[("PORT", "http")]).port, 5000);
        assert_eq!(config_from(&[("PORT", "70000")]).port, 5000);
    }

    #[test]
    fn one_missing_credential_is_not_configured() {
        let config = config_from(&[("PHONE_NUMBER_ID", "123456789")]);
        assert!(config.phone_number_id_set());
        assert!(!config.access_token_set());
        assert!(!config.credentials_set());
    }
}
