//! WhatsApp Business Cloud API sender.
//!
//! Uses the official WhatsApp Business Platform (Cloud API) for messaging.
//! Requires: Access Token + Phone Number ID from Meta Business Suite.

use async_trait::async_trait;
use serde_json::json;

use fidela_core::error::{FidelaError, Result};
use fidela_core::traits::Sender;

/// WhatsApp Business channel configuration.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Facebook Graph API access token
    pub access_token: String,
    /// WhatsApp Phone Number ID
    pub phone_number_id: String,
}

/// WhatsApp Business sender.
pub struct WhatsAppSender {
    config: WhatsAppConfig,
    client: reqwest::Client,
}

// A hung Graph API call must resolve to a failure, not stall a pipeline.
const SEND_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

impl WhatsAppSender {
    pub fn new(config: WhatsAppConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!(
            "https://graph.facebook.com/v21.0/{}/messages",
            self.config.phone_number_id
        )
    }

    async fn post_message(&self, body: serde_json::Value) -> Result<String> {
        let response = self
            .client
            .post(self.api_url())
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(SEND_TIMEOUT)
            .send()
            .await
            .map_err(|e| FidelaError::Channel(format!("WhatsApp API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(FidelaError::Channel(format!(
                "WhatsApp API error {status}: {error_text}"
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FidelaError::Channel(format!("Invalid WhatsApp response: {e}")))?;

        Ok(result["messages"][0]["id"].as_str().unwrap_or("unknown").to_string())
    }
}

#[async_trait]
impl Sender for WhatsAppSender {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, phone: &str, message: &str, image: Option<&str>) -> Result<()> {
        let body = match image {
            Some(link) => json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": phone,
                "type": "image",
                "image": {
                    "link": link,
                    "caption": message
                }
            }),
            None => json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": phone,
                "type": "text",
                "text": {
                    "preview_url": false,
                    "body": message
                }
            }),
        };

        let msg_id = self.post_message(body).await?;
        tracing::debug!("WhatsApp message sent: {} → {}", msg_id, phone);
        Ok(())
    }
}
