//! Wire types for the downstream conversational service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST {base}/chat`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCallBody<'a> {
    pub session_id: &'a str,
    pub message: &'a str,
    pub context: &'a Map<String, Value>,
}

/// Reply of `POST {base}/chat`.
///
/// Older agents answer with `response` instead of `reply`. A missing or
/// `null` reply, list or map is accepted and treated as empty.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCallReply {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, alias = "response")]
    pub reply: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<Value>>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Reply of `POST {base}/session`.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionCreated {
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_accepts_response_alias_and_nulls() {
        let parsed: ChatCallReply = serde_json::from_str(
            r#"{"session_id": "s1", "response": "hi", "sources": null, "metadata": null}"#,
        )
        .unwrap();
        assert_eq!(parsed.reply.as_deref(), Some("hi"));
        assert!(parsed.sources.is_none());
        assert!(parsed.metadata.is_none());
    }

    #[test]
    fn test_null_or_missing_reply_is_accepted() {
        for body in [r#"{"session_id": "s1", "reply": null}"#, r#"{"session_id": "s1"}"#] {
            let parsed: ChatCallReply = serde_json::from_str(body).unwrap();
            assert_eq!(parsed.reply, None);
        }
    }

    #[test]
    fn test_non_object_reply_is_rejected() {
        assert!(serde_json::from_str::<ChatCallReply>(r#"["s1", "hi"]"#).is_err());
        assert!(serde_json::from_str::<ChatCallReply>(r#"{"reply": 42}"#).is_err());
    }
}
