use crate::config::PushConfig;
use crate::error::{AppError, AppResult};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Serialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize)]
struct TriggerBody {
    name: String,
    channel: String,
    data: String,
}

/// Pusher Channels HTTP API client. Events carry the announcement payload to
/// browsers subscribed to the audience channel.
#[derive(Clone)]
pub struct PushService {
    client: Client,
    config: PushConfig,
}

impl PushService {
    pub fn new(config: PushConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn announcement_channel(member_id: Option<i64>) -> String {
        match member_id {
            Some(id) => format!("announcement.user.{id}"),
            None => "announcement.public".to_string(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.config.app_id.is_empty()
            && !self.config.key.is_empty()
            && !self.config.secret.is_empty()
    }

    pub async fn trigger<T: Serialize>(
        &self,
        channel: &str,
        event: &str,
        payload: &T,
    ) -> AppResult<()> {
        if !self.is_configured() {
            log::debug!("Push service not configured, skipping event '{event}' on {channel}");
            return Ok(());
        }

        let data = serde_json::to_string(payload)?;
        let body = serde_json::to_string(&TriggerBody {
            name: event.to_string(),
            channel: channel.to_string(),
            data,
        })?;

        // auth params sorted alphabetically, signed with HMAC-SHA256
        let body_md5 = format!("{:x}", md5::compute(body.as_bytes()));
        let timestamp = chrono::Utc::now().timestamp();
        let path = format!("/apps/{}/events", self.config.app_id);
        let query = format!(
            "auth_key={}&auth_timestamp={timestamp}&auth_version=1.0&body_md5={body_md5}",
            self.config.key
        );
        let to_sign = format!("POST\n{path}\n{query}");

        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .map_err(|e| AppError::InternalError(format!("Invalid push secret: {e}")))?;
        mac.update(to_sign.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        let url = format!(
            "https://api-{}.pusher.com{path}?{query}&auth_signature={signature}",
            self.config.cluster
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApiError(format!(
                "Push trigger failed ({status}): {text}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_channel_names() {
        assert_eq!(
            PushService::announcement_channel(Some(42)),
            "announcement.user.42"
        );
        assert_eq!(
            PushService::announcement_channel(None),
            "announcement.public"
        );
    }
}
