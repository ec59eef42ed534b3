use async_trait::async_trait;
use reqwest::{Client, Url};
use std::error::Error as StdError;
use std::time::Duration;
use tracing::debug;

use super::traits::{Transport, check_target};
use crate::config::DispatcherConfig;
use crate::core::target::Target;
use crate::errors::{DispatchError, FetchError};

/// GETs each target over HTTP(S) and counts the body bytes while discarding
/// them.
pub struct HttpTransport {
    client: Client,
    accept_any_status: bool,
}

impl HttpTransport {
    pub fn new(config: &DispatcherConfig) -> Result<Self, DispatchError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(ms) = config.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| DispatchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            accept_any_status: config.accept_any_status,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn id(&self) -> String {
        "http".to_string()
    }

    fn validate(&self, target: &Target) -> Result<(), FetchError> {
        check_target(target)?;
        let url = Url::parse(target.url())
            .map_err(|e| FetchError::InvalidTarget(format!("{}: {}", target.url(), e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(FetchError::InvalidTarget(format!(
                "{}: unsupported scheme {}",
                target.url(),
                other
            ))),
        }
    }

    async fn fetch(&self, target: &Target) -> Result<u64, FetchError> {
        let mut response = self
            .client
            .get(target.url())
            .send()
            .await
            .map_err(|e| FetchError::Transport(describe(&e)))?;

        let status = response.status();
        debug!("{} responded {}", target, status);
        if !status.is_success() && !self.accept_any_status {
            return Err(FetchError::Status(status.as_u16()));
        }

        let mut nbytes = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::BodyRead {
                url: target.url().to_string(),
                reason: describe(&e),
            })?
        {
            nbytes += chunk.len() as u64;
        }

        Ok(nbytes)
    }
}

// reqwest's top-level message hides the interesting part (refused, DNS...)
// in the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
