// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack-backed implementation of the [`Notifier`] trait.
//!
//! New conversations open a channel thread carrying the visitor's contact
//! details; replies post into the existing thread. Rejection and transport
//! failures are folded into [`NotifyOutcome::Failed`] so callers apply their
//! own degradation policy.

pub mod client;
pub mod types;

use async_trait::async_trait;
use chatlink_config::SlackConfig;
use chatlink_core::{ChatlinkError, Notifier, NotifyMeta, NotifyOutcome};
use tracing::warn;

pub use client::SlackClient;

/// [`Notifier`] posting to a single Slack channel via `chat.postMessage`.
pub struct SlackNotifier {
    client: SlackClient,
}

impl SlackNotifier {
    /// Builds a notifier from configuration.
    ///
    /// Both the bot token and the channel id must be present; an absent
    /// credential is a [`ChatlinkError::Config`].
    pub fn new(config: &SlackConfig) -> Result<Self, ChatlinkError> {
        let token = config
            .bot_token
            .as_deref()
            .ok_or_else(|| ChatlinkError::Config("slack.bot_token is not set".into()))?;
        let channel = config
            .channel_id
            .clone()
            .ok_or_else(|| ChatlinkError::Config("slack.channel_id is not set".into()))?;

        let client = SlackClient::new(token, channel, config.api_base_url.clone())?;
        Ok(Self { client })
    }

    #[cfg(test)]
    fn with_client(client: SlackClient) -> Self {
        Self { client }
    }
}

/// Renders the thread-opening message for a new conversation.
fn render_intake_text(text: &str, meta: &NotifyMeta) -> String {
    let mut out = String::from(":speech_balloon: *New website conversation*\n");
    out.push_str(&format!("*Name:* {}\n", meta.name));
    out.push_str(&format!("*Email:* {}\n", meta.email));
    out.push_str(&format!("*Phone:* {}\n", meta.phone));
    if let Some(company) = &meta.company {
        out.push_str(&format!("*Company:* {company}\n"));
    }
    out.push_str(&format!("\n>{text}"));
    out
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(
        &self,
        thread_ts: Option<&str>,
        text: &str,
        meta: &NotifyMeta,
    ) -> NotifyOutcome {
        let rendered = match thread_ts {
            None => render_intake_text(text, meta),
            Some(_) => text.to_string(),
        };

        match self.client.post_message(thread_ts, &rendered).await {
            Ok(resp) if resp.ok => match resp.ts {
                Some(ts) => NotifyOutcome::Delivered { external_id: ts },
                None => {
                    warn!("Slack accepted the message but returned no ts");
                    NotifyOutcome::Failed {
                        reason: "Slack response carried no message timestamp".into(),
                    }
                }
            },
            Ok(resp) => {
                let reason = resp.error.unwrap_or_else(|| "unknown_error".into());
                warn!(reason = %reason, "Slack rejected chat.postMessage");
                NotifyOutcome::Failed { reason }
            }
            Err(e) => {
                warn!(error = %e, "Slack delivery failed");
                NotifyOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
