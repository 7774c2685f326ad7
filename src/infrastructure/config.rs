use crate::domain::error::InvalidServerTimezone;
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub datasource: DatasourceSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatasourceSettings {
    pub url: String,
    /// `""` for UTC, otherwise `±HH:MM`.
    #[serde(default)]
    pub server_timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

impl DatasourceSettings {
    /// Offset the storage server reports wall-clock times in.
    pub fn server_offset(&self) -> Result<FixedOffset, InvalidServerTimezone> {
        if self.server_timezone.is_empty() {
            return Ok(Utc.fix());
        }
        parse_utc_offset(&self.server_timezone)
    }
}

/// Parse a strict `±HH:MM` offset.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, InvalidServerTimezone> {
    let invalid = || InvalidServerTimezone(raw.to_string());

    let bytes = raw.as_bytes();
    if bytes.len() != 6 || bytes[3] != b':' {
        return Err(invalid());
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(invalid()),
    };
    let digits = [bytes[1], bytes[2], bytes[4], bytes[5]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let value = |hi: u8, lo: u8| i32::from(hi - b'0') * 10 + i32::from(lo - b'0');
    let hours = value(digits[0], digits[1]);
    let minutes = value(digits[2], digits[3]);
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/fiap").required(false))
        .add_source(
            config::Environment::with_prefix("FIAP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
