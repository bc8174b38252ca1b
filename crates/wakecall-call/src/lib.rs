//! `wakecall-call` — the outbound notification channel.
//!
//! Implements [`WakeAction`] by placing a voice call through the Twilio REST
//! API with a fixed TwiML announcement. The scheduler never sees any of this;
//! it only observes success or failure.

use async_trait::async_trait;
use tracing::{debug, info};
use wakecall_alarm::{WakeAction, WakeError};
use wakecall_core::config::TwilioConfig;

const API_BASE: &str = "https://api.twilio.com";

/// Announcement played to the callee when no override is configured.
static DEFAULT_TWIML: &str = include_str!("response.twiml");

/// Places the wake-up call.
pub struct TwilioCaller {
    client: reqwest::Client,
    sid: String,
    token: String,
    from: String,
    to: String,
    twiml: String,
    base_url: String,
}

impl TwilioCaller {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            sid: config.sid.clone(),
            token: config.token.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
            twiml: config
                .twiml
                .clone()
                .unwrap_or_else(|| DEFAULT_TWIML.to_string()),
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn calls_endpoint(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.base_url, self.sid
        )
    }
}

#[async_trait]
impl WakeAction for TwilioCaller {
    async fn wake(&self) -> Result<(), WakeError> {
        info!(to = %self.to, "placing wake-up call");

        let response = self
            .client
            .post(self.calls_endpoint())
            .basic_auth(&self.sid, Some(&self.token))
            .form(&[
                ("Twiml", self.twiml.as_str()),
                ("To", self.to.as_str()),
                ("From", self.from.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WakeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WakeError::Rejected(format!("{status}: {body}")));
        }

        debug!("wake-up call accepted by Twilio");
        Ok(())
    }
}
