//! Concurrent session manager.
//!
//! Each session owns its own stability window behind its own mutex, so
//! frames of one session are classified in arrival order while different
//! sessions proceed in parallel. Sessions are created on their first frame
//! and live until they are ended.

use std::collections::HashMap;
use std::sync::Arc;

use handsign_core::{Error, GestureLabel, Landmark, Result, SessionId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::{ClassifierConfig, SessionConfig};
use crate::pipeline::ClassificationResult;
use crate::recognizer::{RecognitionMethod, RecognizerRegistry};
use crate::session::RecognitionSession;

type SharedSession = Arc<Mutex<RecognitionSession>>;

/// Snapshot of one session's bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: SessionId,
    pub started_at: Timestamp,
    pub frames_processed: u64,
    pub window_len: usize,
    pub last_label: Option<GestureLabel>,
}

pub struct SessionManager {
    registry: RecognizerRegistry,
    sessions: RwLock<HashMap<SessionId, SharedSession>>,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(registry: RecognizerRegistry, config: &SessionConfig) -> Self {
        Self {
            registry,
            sessions: RwLock::new(HashMap::new()),
            max_sessions: config.max_sessions,
        }
    }

    /// Build the registry from `classifier` and wrap it
    pub fn from_config(classifier: &ClassifierConfig, sessions: &SessionConfig) -> Result<Self> {
        Ok(Self::new(RecognizerRegistry::new(classifier)?, sessions))
    }

    pub fn registry(&self) -> &RecognizerRegistry {
        &self.registry
    }

    /// Classify a frame with the default method. Failures become `Error` results.
    pub async fn process(&self, session_id: SessionId, landmarks: &[Landmark]) -> ClassificationResult {
        let method = self.registry.default_method();
        match self.process_with(Some(method), session_id, landmarks).await {
            Ok(result) => result,
            Err(e) => {
                warn!(session = %session_id, "frame rejected: {}", e);
                ClassificationResult::error(method, e.to_string())
            }
        }
    }

    /// Classify a frame with `method` (or the default when `None`)
    pub async fn process_with(
        &self,
        method: Option<RecognitionMethod>,
        session_id: SessionId,
        landmarks: &[Landmark],
    ) -> Result<ClassificationResult> {
        let recognizer = self.registry.resolve(method)?;
        let session = self.session(session_id).await?;

        let mut session = session.lock().await;
        Ok(recognizer.recognize(&mut session, landmarks))
    }

    /// Clear a session's history. Returns whether the session existed.
    pub async fn reset_session(&self, session_id: SessionId) -> bool {
        let session = self.sessions.read().await.get(&session_id).cloned();
        match session {
            Some(session) => {
                session.lock().await.reset();
                debug!(session = %session_id, "session reset");
                true
            }
            None => false,
        }
    }

    /// Drop a session. Returns whether the session existed.
    pub async fn end_session(&self, session_id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            info!(session = %session_id, "session ended");
        }
        removed
    }

    pub async fn active_sessions(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn session_stats(&self, session_id: SessionId) -> Option<SessionStats> {
        let session = self.sessions.read().await.get(&session_id).cloned()?;
        let session = session.lock().await;

        Some(SessionStats {
            session_id: session.id,
            started_at: session.started_at,
            frames_processed: session.frames_processed(),
            window_len: session.tracker().window().len(),
            last_label: session.last_label(),
        })
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    async fn session(&self, session_id: SessionId) -> Result<SharedSession> {
        if let Some(session) = self.sessions.read().await.get(&session_id) {
            return Ok(Arc::clone(session));
        }

        let mut sessions = self.sessions.write().await;
        // Another task may have created it between the two locks.
        if let Some(session) = sessions.get(&session_id) {
            return Ok(Arc::clone(session));
        }

        if sessions.len() >= self.max_sessions {
            return Err(Error::SessionLimit {
                limit: self.max_sessions,
            });
        }

        let session = Arc::new(Mutex::new(self.registry.new_session(session_id)));
        sessions.insert(session_id, Arc::clone(&session));
        info!(session = %session_id, active = sessions.len(), "session started");

        Ok(session)
    }
}
