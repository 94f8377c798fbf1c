//! # Fidela Channels
//! Sender implementations for the outbound messaging boundary.
//!
//! Two modes, selected by `[sender] mode` in the config:
//! - `stub` — logs the intended message, never attempts delivery.
//! - `live` — WhatsApp Business Cloud API.

pub mod stub;
pub mod whatsapp;

use std::sync::Arc;

use fidela_core::config::SenderConfig;
use fidela_core::error::{FidelaError, Result};
use fidela_core::traits::Sender;

pub use stub::StubSender;
pub use whatsapp::{WhatsAppConfig, WhatsAppSender};

/// Build the configured Sender.
pub fn from_config(config: &SenderConfig) -> Result<Arc<dyn Sender>> {
    match config.mode.as_str() {
        "stub" => Ok(Arc::new(StubSender)),
        "live" | "whatsapp" => {
            if config.access_token.is_empty() {
                return Err(FidelaError::Config(
                    "sender.access_token not configured for live mode".into(),
                ));
            }
            if config.phone_number_id.is_empty() {
                return Err(FidelaError::Config(
                    "sender.phone_number_id not configured for live mode".into(),
                ));
            }
            Ok(Arc::new(WhatsAppSender::new(WhatsAppConfig {
                access_token: config.access_token.clone(),
                phone_number_id: config.phone_number_id.clone(),
            })))
        }
        other => Err(FidelaError::Config(format!(
            "unknown sender mode '{other}' (expected 'stub' or 'live')"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_mode_builds() {
        let sender = from_config(&SenderConfig::default()).unwrap();
        assert_eq!(sender.name(), "stub");
    }

    #[test]
    fn live_mode_requires_credentials() {
        let mut cfg = SenderConfig { mode: "live".into(), ..Default::default() };
        assert!(from_config(&cfg).is_err());

        cfg.access_token = "tok".into();
        cfg.phone_number_id = "123".into();
        assert_eq!(from_config(&cfg).unwrap().name(), "whatsapp");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let cfg = SenderConfig { mode: "carrier-pigeon".into(), ..Default::default() };
        assert!(from_config(&cfg).is_err());
    }
}
