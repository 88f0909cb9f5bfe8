use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPTION: &str = "⚠️ ALERT: Dangerous sound detected!";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Bot credential; opaque configuration value, supplied via config file
    /// or environment.
    pub bot_token: String,
    pub api_host: String,
    /// Wall-clock budget for reading the response. A response arriving
    /// later is discarded and counts as a transport failure.
    pub response_timeout_secs: u64,
    /// Disables certificate validation. Off by default; enabling it is
    /// logged at WARN on startup.
    pub insecure_tls: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_host: "api.telegram.org".to_string(),
            response_timeout_secs: 5,
            insecure_tls: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Recipient chat id.
    pub chat_id: String,
    pub caption: String,
    pub transport: TransportConfig,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            chat_id: String::new(),
            caption: DEFAULT_CAPTION.to_string(),
            transport: TransportConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_defaults_are_safe() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.api_host, "api.telegram.org");
        assert_eq!(cfg.response_timeout_secs, 5);
        assert!(!cfg.insecure_tls, "validation must be on by default");
    }
}
