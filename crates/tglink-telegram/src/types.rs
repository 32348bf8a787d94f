//! Typed subsets of the Bot API payloads we read and write.
//!
//! Only the fields the gateway uses are modeled; serde ignores the rest.

use serde::{Deserialize, Serialize};

use tglink_core::domain::{ChatId, TelegramHandle};

/// Bot API envelope: `{"ok": true, "result": ...}` or
/// `{"ok": false, "description": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `getMe` result. A bot always has a username.
#[derive(Debug, Deserialize)]
pub struct BotUser {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<Sender>,
    pub chat: Chat,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: RawChatId,
}

/// Telegram sends chat ids as integers; accept strings as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawChatId {
    Int(i64),
    Str(String),
}

impl From<RawChatId> for ChatId {
    fn from(raw: RawChatId) -> Self {
        match raw {
            RawChatId::Int(i) => ChatId(i.to_string()),
            RawChatId::Str(s) => ChatId(s),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessageBody<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// First update whose message was sent by `handle`; later matches are ignored.
pub fn find_chat_for(updates: Vec<Update>, handle: &TelegramHandle) -> Option<ChatId> {
    updates
        .into_iter()
        .filter_map(|u| u.message)
        .find(|m| {
            m.from
                .as_ref()
                .and_then(|f| f.username.as_deref())
                .is_some_and(|name| name == handle.as_str())
        })
        .map(|m| m.chat.id.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updates(raw: &str) -> Vec<Update> {
        let resp: ApiResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        resp.result.unwrap()
    }

    fn handle(h: &str) -> TelegramHandle {
        TelegramHandle::normalize(h).unwrap()
    }

    #[test]
    fn first_matching_sender_wins() {
        let u = updates(
            r#"{"ok":true,"result":[
                {"update_id":1,"message":{"message_id":1,"from":{"id":5,"is_bot":false,"username":"alice"},"chat":{"id":5,"type":"private"}}},
                {"update_id":2,"message":{"message_id":2,"from":{"id":7,"is_bot":false,"username":"bob"},"chat":{"id":700,"type":"private"}}},
                {"update_id":3,"message":{"message_id":3,"from":{"id":7,"is_bot":false,"username":"bob"},"chat":{"id":701,"type":"private"}}}
            ]}"#,
        );
        assert_eq!(
            find_chat_for(u, &handle("bob")),
            Some(ChatId("700".to_string()))
        );
    }

    #[test]
    fn skips_updates_without_message_or_username() {
        let u = updates(
            r#"{"ok":true,"result":[
                {"update_id":1,"callback_query":{"id":"x"}},
                {"update_id":2,"message":{"chat":{"id":-100123}}},
                {"update_id":3,"message":{"from":{"id":9},"chat":{"id":9}}},
                {"update_id":4,"message":{"from":{"username":"carol"},"chat":{"id":"-42"}}}
            ]}"#,
        );
        assert_eq!(
            find_chat_for(u, &handle("carol")),
            Some(ChatId("-42".to_string()))
        );
    }

    #[test]
    fn no_match_is_none() {
        let u = updates(r#"{"ok":true,"result":[]}"#);
        assert_eq!(find_chat_for(u, &handle("dave")), None);
    }

    #[test]
    fn error_envelope_has_no_result() {
        let resp: ApiResponse<BotUser> =
            serde_json::from_str(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#)
                .unwrap();
        assert!(!resp.ok);
        assert!(resp.result.is_none());
        assert_eq!(resp.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn send_body_shape() {
        let body = SendMessageBody {
            chat_id: "123",
            text: "hello",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"chat_id": "123", "text": "hello"})
        );
    }
}
