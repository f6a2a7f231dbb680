use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_TURN_ALERT_MESSAGE: &str = "It's your turn! Please prepare to join the call.";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    /// JSON file with the doctor roster. Built-in doctors are used when unset.
    pub doctors_seed_file: Option<String>,
    pub turn_alert_message: String,
    /// Outbound buffer per WebSocket connection. Events beyond it are dropped.
    pub ws_channel_capacity: usize,
    pub strict_status_transitions: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            doctors_seed_file: None,
            turn_alert_message: DEFAULT_TURN_ALERT_MESSAGE.to_string(),
            ws_channel_capacity: 64,
            strict_status_transitions: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| {
                    warn!("SERVER_HOST not set, using {}", defaults.server_host);
                    defaults.server_host.clone()
                }),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            doctors_seed_file: env::var("DOCTORS_SEED_FILE")
                .ok()
                .filter(|path| !path.trim().is_empty()),
            turn_alert_message: env::var("TURN_ALERT_MESSAGE")
                .unwrap_or_else(|_| defaults.turn_alert_message.clone()),
            ws_channel_capacity: parse_var("WS_CHANNEL_CAPACITY", defaults.ws_channel_capacity),
            strict_status_transitions: parse_var(
                "STRICT_STATUS_TRANSITIONS",
                defaults.strict_status_transitions,
            ),
        };

        if config.ws_channel_capacity == 0 {
            warn!("WS_CHANNEL_CAPACITY must be positive, using {}", defaults.ws_channel_capacity);
            return Self {
                ws_channel_capacity: defaults.ws_channel_capacity,
                ..config
            };
        }

        config
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
