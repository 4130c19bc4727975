use crate::config::{OfferConstraints, SessionConfig};
use crate::error::{DemoError, Result};
use crate::event_log::{EventSink, GatedSink};
use crate::peer::connection::{apply_offer_constraints, new_peer};
use crate::peer::engine;
use crate::peer::negotiation::NegotiationObserver;
use crate::peer::observer::SignalingObserver;
use crate::utils::random_id;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use webrtc::api::API;
use webrtc::peer_connection::RTCPeerConnection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Gathering,
    Disposed,
}

/// One peer connection, the factory that built it and the tasks observing it.
///
/// The observer and negotiation tasks are owned here. `dispose` closes the
/// sink gate and waits for both tasks to stop, so nothing reaches the sink
/// once it returns. Dropping without `dispose` only aborts the tasks and
/// schedules a close of the connection.
pub struct Session {
    id: String,
    factory: Mutex<Option<API>>,
    pc: Arc<RTCPeerConnection>,
    sink: Arc<GatedSink>,
    offer: OfferConstraints,
    state: Mutex<SessionState>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl Session {
    /// Builds the factory and the peer connection.
    ///
    /// Engine initialization happens at most once per process. Fails with
    /// [`DemoError::Initialization`] when no connection can be produced.
    pub async fn create(config: SessionConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        config.validate()?;
        engine::initialize(&config.init);

        let factory = engine::build_factory(&config.factory)?;
        let id = random_id();
        let (pc, events) = new_peer(&factory, &config, &id).await?;

        let sink = Arc::new(GatedSink::new(sink));
        let observer = SignalingObserver::new(id.clone(), sink.clone());
        let observer_task = tokio::spawn(observer.run(events));

        Ok(Self {
            id,
            factory: Mutex::new(Some(factory)),
            pc,
            sink,
            offer: config.offer,
            state: Mutex::new(SessionState::Created),
            tasks: Mutex::new(vec![observer_task]),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    /// Starts ICE gathering by creating an offer and setting it locally.
    ///
    /// Returns once the negotiation task is spawned; results arrive on the sink.
    pub async fn gather_candidates(&self) -> Result<()> {
        {
            let mut state = lock(&self.state);
            match *state {
                SessionState::Created => *state = SessionState::Gathering,
                SessionState::Gathering => return Err(DemoError::AlreadyGathering),
                SessionState::Disposed => return Err(DemoError::Disposed),
            }
        }

        if let Err(e) = apply_offer_constraints(&self.pc, &self.offer).await {
            let mut state = lock(&self.state);
            if *state == SessionState::Gathering {
                *state = SessionState::Created;
            }
            return Err(e);
        }

        let state = lock(&self.state);
        if *state == SessionState::Disposed {
            return Err(DemoError::Disposed);
        }
        let observer = NegotiationObserver::new(self.sink.clone());
        let pc = self.pc.clone();
        let id = self.id.clone();
        let task = tokio::spawn(async move {
            let outcome = observer.run(pc).await;
            log::info!("Negotiation for {} ended in {:?}", id, outcome);
        });
        lock(&self.tasks).push(task);
        drop(state);
        Ok(())
    }

    /// SDP of the local description, once the offer has been installed.
    pub async fn local_sdp(&self) -> Result<Option<String>> {
        if self.state() == SessionState::Disposed {
            return Err(DemoError::Disposed);
        }
        Ok(self.pc.local_description().await.map(|d| d.sdp))
    }

    /// Stops the observers, closes the connection and releases the factory.
    /// The session cannot be used afterwards.
    pub async fn dispose(&self) -> Result<()> {
        {
            let mut state = lock(&self.state);
            if *state == SessionState::Disposed {
                return Err(DemoError::AlreadyDisposed);
            }
            *state = SessionState::Disposed;
        }

        log::info!("Disposing peer connection {}", self.id);
        self.sink.close();
        let tasks: Vec<JoinHandle<()>> = lock(&self.tasks).drain(..).collect();
        for task in &tasks {
            task.abort();
        }
        // A task caught in the middle of an emit finishes that line first.
        for task in tasks {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    log::warn!("Session {} task failed: {}", self.id, e);
                }
            }
        }
        let closed = self.pc.close().await;
        lock(&self.factory).take();
        closed?;
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.state() != SessionState::Disposed {
            log::warn!("Session {} dropped without dispose", self.id);
            self.sink.close();
            for task in lock(&self.tasks).drain(..) {
                task.abort();
            }
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let pc = self.pc.clone();
                handle.spawn(async move {
                    if let Err(e) = pc.close().await {
                        log::warn!("Closing dropped peer connection failed: {}", e);
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::event_log::EventLog;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_constraints_leave_the_session_retryable() {
        let session = Session::create(SessionConfig::default(), Arc::new(EventLog::new()))
            .await
            .unwrap();

        // Transceivers cannot be added to a closed connection.
        session.pc.close().await.unwrap();
        assert!(matches!(
            session.gather_candidates().await,
            Err(DemoError::Engine(_))
        ));
        assert_eq!(session.state(), SessionState::Created);
        assert!(matches!(
            session.gather_candidates().await,
            Err(DemoError::Engine(_))
        ));
        assert_eq!(lock(&session.tasks).len(), 1);

        session.dispose().await.unwrap();
    }
}
