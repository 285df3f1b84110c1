//! Line-delimited JSON messages exchanged with clients.
//!
//! Every message is a single JSON object tagged by `type`:
//!
//! ```text
//! {"type":"gesture_landmarks","session_id":"…","landmarks":[{"x":0.5,"y":0.5,"z":0.0}, …]}
//! {"type":"gesture_result","session_id":"…","data":{…},"timestamp":1700000000000000000}
//! ```

use handsign_classify::{ClassificationResult, RecognitionMethod};
use handsign_core::{Landmark, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

/// Client → service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    GestureLandmarks {
        session_id: SessionId,
        landmarks: Vec<Landmark>,
        /// Recognition method; the configured default when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        method: Option<RecognitionMethod>,
    },
    ResetSession {
        session_id: SessionId,
    },
    EndSession {
        session_id: SessionId,
    },
    Ping,
}

/// Service → client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    GestureResult {
        session_id: SessionId,
        data: ClassificationResult,
        timestamp: Timestamp,
    },
    SessionReset {
        session_id: SessionId,
        existed: bool,
    },
    SessionEnded {
        session_id: SessionId,
        existed: bool,
    },
    Pong {
        timestamp: Timestamp,
    },
    Error {
        message: String,
        timestamp: Timestamp,
    },
}

impl Outbound {
    pub fn error(message: impl Into<String>) -> Self {
        Outbound::Error {
            message: message.into(),
            timestamp: Timestamp::now(),
        }
    }

    pub fn pong() -> Self {
        Outbound::Pong {
            timestamp: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_tags() {
        let ping: Inbound = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(ping, Inbound::Ping));

        let id = SessionId::new();
        let line = format!(
            r#"{{"type":"gesture_landmarks","session_id":"{}","landmarks":[{{"x":0.1,"y":0.2,"z":0.0}}]}}"#,
            id
        );
        match serde_json::from_str::<Inbound>(&line).unwrap() {
            Inbound::GestureLandmarks {
                session_id,
                landmarks,
                method,
            } => {
                assert_eq!(session_id, id);
                assert_eq!(landmarks.len(), 1);
                assert_eq!(landmarks[0].confidence, 1.0);
                assert_eq!(method, None);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_outbound_tags() {
        let json = serde_json::to_value(Outbound::error("bad line")).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "bad line");

        let json = serde_json::to_value(Outbound::SessionEnded {
            session_id: SessionId::new(),
            existed: false,
        })
        .unwrap();
        assert_eq!(json["type"], "session_ended");
        assert_eq!(json["existed"], false);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<Inbound>(r#"{"type":"subscribe"}"#).is_err());
    }
}
