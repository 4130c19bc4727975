use crate::config::SessionConfig;
use crate::error::Result;
use crate::event_log::EventLog;
use crate::session::Session;
use std::sync::Arc;

pub const READY: &str = "Ready! Press button.";
pub const CYCLE_SEPARATOR: &str = "---";
pub const DISPOSING_PREVIOUS: &str = "> Disposing previous peer connection...";
pub const CREATING: &str = "> Creating peer connection...";
pub const GATHERING: &str = "> Gather candidates...";
pub const DISPOSING: &str = "> Disposing peer connection...";
pub const DONE: &str = "> Done";

/// Disposes a session the shell is giving up on. Failures are only logged.
async fn discard(session: &Session) {
    if let Err(e) = session.dispose().await {
        log::warn!("Disposing session {} failed: {}", session.id(), e);
    }
}

/// The demo's single interaction: a trigger plus the log it writes to.
pub struct Shell {
    config: SessionConfig,
    log: EventLog,
    current: Option<Session>,
}

impl Shell {
    pub fn new(config: SessionConfig) -> Self {
        let log = EventLog::new();
        log.append(READY);
        Self {
            config,
            log,
            current: None,
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Replaces the previous session with a fresh one and starts gathering.
    ///
    /// The new session outlives this call: it keeps reporting candidates
    /// until the next press or `shutdown` disposes it.
    pub async fn press(&mut self) -> Result<()> {
        if let Some(previous) = self.current.take() {
            self.log.append(DISPOSING_PREVIOUS);
            discard(&previous).await;
        }
        self.log.append(CYCLE_SEPARATOR);

        self.log.append(CREATING);
        let session = Session::create(self.config.clone(), Arc::new(self.log.clone())).await?;

        self.log.append(GATHERING);
        if let Err(e) = session.gather_candidates().await {
            discard(&session).await;
            return Err(e);
        }

        self.log.append(DISPOSING);
        self.current = Some(session);
        self.log.append(DONE);
        Ok(())
    }

    /// Disposes the live session, if any.
    pub async fn shutdown(&mut self) -> Result<()> {
        match self.current.take() {
            Some(session) => session.dispose().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn discarding_a_disposed_session_only_warns() {
        let session = Session::create(SessionConfig::default(), Arc::new(EventLog::new()))
            .await
            .unwrap();
        discard(&session).await;
        assert_eq!(session.state(), SessionState::Disposed);

        // The second dispose fails with AlreadyDisposed and is swallowed.
        discard(&session).await;
        assert_eq!(session.state(), SessionState::Disposed);
    }
}
