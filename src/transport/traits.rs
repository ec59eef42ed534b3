use async_trait::async_trait;

use crate::core::target::Target;
use crate::errors::FetchError;

/// Rejects empty targets and any target carrying whitespace or control
/// characters, which URL parsers silently strip.
pub fn check_target(target: &Target) -> Result<(), FetchError> {
    let url = target.url();
    if url.is_empty() {
        return Err(FetchError::InvalidTarget("empty target".to_string()));
    }
    if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(FetchError::InvalidTarget(url.escape_debug().to_string()));
    }
    Ok(())
}

#[async_trait]
pub trait Transport: Send + Sync {
    fn id(&self) -> String;

    /// Rejects targets that cannot be fetched at all. Called before
    /// [`Transport::fetch`], which is skipped when this fails.
    fn validate(&self, target: &Target) -> Result<(), FetchError> {
        check_target(target)
    }

    /// Retrieves and consumes the target's body, returning its byte count.
    async fn fetch(&self, target: &Target) -> Result<u64, FetchError>;
}
