//! Stub sender — logs intent, never touches the network.
//! Default mode; keeps development and tests free of real sends.

use async_trait::async_trait;

use fidela_core::error::Result;
use fidela_core::traits::Sender;

pub struct StubSender;

#[async_trait]
impl Sender for StubSender {
    fn name(&self) -> &str {
        "stub"
    }

    async fn send(&self, phone: &str, message: &str, image: Option<&str>) -> Result<()> {
        match image {
            Some(img) => tracing::info!("[STUB] WhatsApp to {phone}: {message} (image: {img})"),
            None => tracing::info!("[STUB] WhatsApp to {phone}: {message}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_succeeds() {
        let sender = StubSender;
        assert!(sender.send("+5511999990000", "oi", None).await.is_ok());
        assert!(sender.send("+5511999990000", "oi", Some("/tmp/p.jpg")).await.is_ok());
    }
}
