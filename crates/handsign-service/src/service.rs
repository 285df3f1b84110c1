//! Frame service driving the wire protocol over any async byte stream.

use std::sync::Arc;

use handsign_classify::SessionManager;
use handsign_core::{Result, Timestamp};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::wire::{Inbound, Outbound};

/// Counters for one `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub lines_read: u64,
    pub messages_sent: u64,
    pub errors: u64,
}

pub struct FrameService {
    manager: Arc<SessionManager>,
}

impl FrameService {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;
        let manager = SessionManager::from_config(&config.classifier, &config.sessions)?;
        Ok(Self::new(Arc::new(manager)))
    }

    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Answer one decoded message
    pub async fn handle(&self, message: Inbound) -> Outbound {
        match message {
            Inbound::GestureLandmarks {
                session_id,
                landmarks,
                method,
            } => match self.manager.process_with(method, session_id, &landmarks).await {
                Ok(data) => Outbound::GestureResult {
                    session_id,
                    data,
                    timestamp: Timestamp::now(),
                },
                Err(e) => {
                    warn!(session = %session_id, "frame rejected: {}", e);
                    Outbound::error(e.to_string())
                }
            },
            Inbound::ResetSession { session_id } => Outbound::SessionReset {
                session_id,
                existed: self.manager.reset_session(session_id).await,
            },
            Inbound::EndSession { session_id } => Outbound::SessionEnded {
                session_id,
                existed: self.manager.end_session(session_id).await,
            },
            Inbound::Ping => Outbound::pong(),
        }
    }

    /// Decode and answer one line. Blank lines produce nothing.
    pub async fn handle_line(&self, line: &str) -> Option<Outbound> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<Inbound>(line) {
            Ok(message) => Some(self.handle(message).await),
            Err(e) => {
                debug!("malformed message: {}", e);
                Some(Outbound::error(format!("malformed message: {}", e)))
            }
        }
    }

    /// Serve until `reader` reaches end of stream
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<StreamStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut stats = StreamStats::default();
        let mut lines = reader.lines();

        info!("frame service started");

        while let Some(line) = lines.next_line().await? {
            stats.lines_read += 1;

            let Some(reply) = self.handle_line(&line).await else {
                continue;
            };
            if matches!(reply, Outbound::Error { .. }) {
                stats.errors += 1;
            }

            let mut encoded = serde_json::to_vec(&reply)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
            stats.messages_sent += 1;
        }

        info!(
            lines = stats.lines_read,
            sent = stats.messages_sent,
            errors = stats.errors,
            sessions = self.manager.session_count().await,
            "frame service stopped"
        );

        Ok(stats)
    }
}
