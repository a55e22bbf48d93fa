use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use uuid::Uuid;

/// Shown in place of a reply when the webhook cannot be reached.
pub const FALLBACK_REPLY: &str =
    "Sorry, something went wrong talking to the assistant. Please try again.";

/// A conversation with the webhook assistant. The session id ties messages together on
/// the automation side.
pub struct ChatSession {
    client: Client,
    webhook_url: String,
    session_id: String,
}

impl ChatSession {
    pub fn new(client: Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send `message` as `GET {webhook}?message=..&sessionID=..` and return the reply text.
    pub async fn send(&self, message: &str) -> Result<String> {
        log::debug!("chat session {}: sending {} chars", self.session_id, message.len());

        let response = self
            .client
            .get(&self.webhook_url)
            .query(&[("message", message), ("sessionID", self.session_id.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok(reply_from(status, &body))
    }
}

/// Reply text for a webhook answer. Error statuses still carry a readable body (n8n puts
/// the failure in `message`), so the body is used either way.
pub fn reply_from(status: StatusCode, body: &str) -> String {
    if !status.is_success() {
        log::warn!("chat webhook responded with HTTP {status}");
    }
    extract_reply(body)
}

/// Pull the assistant's text out of a webhook response body.
///
/// JSON objects yield their `response` field, then `message`; anything else (plain text,
/// JSON without those fields) is returned as-is.
pub fn extract_reply(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["response", "message"] {
            if let Some(text) = map.get(key).and_then(Value::as_str) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_field_wins() {
        let body = r#"{"response": "Há 12 clientes em Danger.", "message": "ignored"}"#;
        assert_eq!(extract_reply(body), "Há 12 clientes em Danger.");
    }

    #[test]
    fn test_message_field_fallback() {
        assert_eq!(extract_reply(r#"{"message": "ok"}"#), "ok");
        assert_eq!(extract_reply(r#"{"response": "", "message": "ok"}"#), "ok");
    }

    #[test]
    fn test_plain_text_body() {
        assert_eq!(extract_reply("Workflow was started"), "Workflow was started");
    }

    #[test]
    fn test_json_without_known_fields_is_raw() {
        assert_eq!(extract_reply(r#"{"output": 1}"#), r#"{"output": 1}"#);
        assert_eq!(extract_reply(r#""quoted""#), r#""quoted""#);
    }

    #[test]
    fn test_error_status_keeps_webhook_message() {
        let body = r#"{"message":"Planilha indisponível"}"#;
        assert_eq!(
            reply_from(StatusCode::INTERNAL_SERVER_ERROR, body),
            "Planilha indisponível"
        );
        assert_eq!(reply_from(StatusCode::NOT_FOUND, "not found"), "not found");
        assert_eq!(reply_from(StatusCode::OK, r#"{"response":"oi"}"#), "oi");
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = ChatSession::new(Client::new(), "https://hooks.example.com/chat");
        let b = ChatSession::new(Client::new(), "https://hooks.example.com/chat");
        assert_ne!(a.session_id(), b.session_id());
        assert_eq!(a.session_id().len(), 36);
    }
}
