//! The Sender boundary — black-box capability to deliver a message to a
//! phone number. Implementations live in `fidela-channels`.

use async_trait::async_trait;

use crate::error::Result;

/// Outbound delivery channel.
///
/// Any non-success outcome is reported as `FidelaError::Channel` with an
/// opaque reason string; callers treat all failures uniformly and must be
/// free to call `send` repeatedly. Implementations are expected to enforce
/// their own request timeout so a hung send resolves to a failure.
#[async_trait]
pub trait Sender: Send + Sync {
    /// Channel name, for logs.
    fn name(&self) -> &str;

    /// Attempt delivery of `message` (optionally with an image attachment
    /// reference) to `phone`.
    async fn send(&self, phone: &str, message: &str, image: Option<&str>) -> Result<()>;
}
