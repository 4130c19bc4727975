use crate::event_log::EventSink;
use crate::peer::events::PeerEvent;
use crate::peer::ice::analyze_candidates;
use crate::peer::types::IceCandidate;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

const TAG: &str = "PeerConnectionObserver";

/// Records every connection callback; forwards new candidates to the sink.
pub struct SignalingObserver {
    connection_id: String,
    sink: Arc<dyn EventSink>,
    candidates: Vec<IceCandidate>,
}

impl SignalingObserver {
    pub fn new(connection_id: impl Into<String>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            connection_id: connection_id.into(),
            sink,
            candidates: Vec::new(),
        }
    }

    pub fn handle(&mut self, event: PeerEvent) {
        log::info!(target: TAG, "[{}] {}", self.connection_id, event.name());

        match event {
            PeerEvent::IceCandidate(cand) => {
                log::debug!(
                    target: TAG,
                    "candidate={} sdp_mid={:?} sdp_mline_index={:?}",
                    cand.candidate,
                    cand.sdp_mid,
                    cand.sdp_mline_index
                );
                self.sink
                    .emit(format!("New ICE candidate: {}", cand.candidate));
                self.candidates.push(cand);
            }
            PeerEvent::IceGatheringComplete => {
                log::info!(
                    target: TAG,
                    "ICE candidate gathering completed, {} candidates",
                    self.candidates.len()
                );
                analyze_candidates(&self.candidates);
            }
            other => log::debug!(target: TAG, "{:?}", other),
        }
    }

    /// Candidates forwarded so far
    pub fn candidates(&self) -> &[IceCandidate] {
        &self.candidates
    }

    /// Drains `events` until every sender is gone.
    pub async fn run(mut self, mut events: UnboundedReceiver<PeerEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        log::debug!(target: TAG, "[{}] event stream closed", self.connection_id);
    }
}
