//! Offer creation followed by installing the offer as the local description.
//!
//! The two asynchronous steps run as one task over a small state machine:
//! `AwaitingOfferCreation -> AwaitingLocalDescriptionSet -> Done`, with
//! `Failed` reachable from either waiting state. Failures are only logged;
//! nothing is retried and nothing reaches the event sink.

use crate::event_log::EventSink;
use std::sync::Arc;
use webrtc::peer_connection::RTCPeerConnection;

const TAG: &str = "SdpObserver";

pub const LOCAL_SDP_CREATED: &str = "Local SDP created";
pub const LOCAL_DESCRIPTION_SET: &str = "Local description set";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    AwaitingOfferCreation,
    AwaitingLocalDescriptionSet,
    Done,
    Failed,
}

/// Single-use observer for one offer/local-description exchange.
pub struct NegotiationObserver {
    state: NegotiationState,
    sink: Arc<dyn EventSink>,
}

impl NegotiationObserver {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            state: NegotiationState::AwaitingOfferCreation,
            sink,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn on_create_success(&mut self) {
        log::info!(target: TAG, "onCreateSuccess");
        if self.state != NegotiationState::AwaitingOfferCreation {
            log::warn!(target: TAG, "offer created while {:?}, ignoring", self.state);
            return;
        }
        self.sink.emit(LOCAL_SDP_CREATED.to_owned());
        self.state = NegotiationState::AwaitingLocalDescriptionSet;
    }

    pub fn on_create_failure(&mut self, reason: &str) {
        log::info!(target: TAG, "onCreateFailure");
        if self.state != NegotiationState::AwaitingOfferCreation {
            log::warn!(target: TAG, "create failure while {:?}, ignoring", self.state);
            return;
        }
        log::warn!(target: TAG, "offer creation failed: {}", reason);
        self.state = NegotiationState::Failed;
    }

    pub fn on_set_success(&mut self) {
        log::info!(target: TAG, "onSetSuccess");
        if self.state != NegotiationState::AwaitingLocalDescriptionSet {
            log::warn!(target: TAG, "description set while {:?}, ignoring", self.state);
            return;
        }
        self.sink.emit(LOCAL_DESCRIPTION_SET.to_owned());
        self.state = NegotiationState::Done;
    }

    pub fn on_set_failure(&mut self, reason: &str) {
        log::info!(target: TAG, "onSetFailure");
        if self.state != NegotiationState::AwaitingLocalDescriptionSet {
            log::warn!(target: TAG, "set failure while {:?}, ignoring", self.state);
            return;
        }
        log::warn!(target: TAG, "setting local description failed: {}", reason);
        self.state = NegotiationState::Failed;
    }

    /// Creates the offer and installs it locally. Setting the local
    /// description is what starts ICE gathering.
    pub async fn run(mut self, pc: Arc<RTCPeerConnection>) -> NegotiationState {
        let offer = match pc.create_offer(None).await {
            Ok(offer) => {
                self.on_create_success();
                offer
            }
            Err(e) => {
                self.on_create_failure(&e.to_string());
                return self.state;
            }
        };

        match pc.set_local_description(offer).await {
            Ok(()) => self.on_set_success(),
            Err(e) => self.on_set_failure(&e.to_string()),
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::EventLog;

    fn observer() -> (NegotiationObserver, EventLog) {
        let log = EventLog::new();
        (NegotiationObserver::new(Arc::new(log.clone())), log)
    }

    #[test]
    fn success_path_forwards_both_lines() {
        let (mut obs, log) = observer();
        assert_eq!(obs.state(), NegotiationState::AwaitingOfferCreation);
        obs.on_create_success();
        assert_eq!(obs.state(), NegotiationState::AwaitingLocalDescriptionSet);
        obs.on_set_success();
        assert_eq!(obs.state(), NegotiationState::Done);
        assert_eq!(log.snapshot(), vec![LOCAL_SDP_CREATED, LOCAL_DESCRIPTION_SET]);
    }

    #[test]
    fn create_failure_is_silent_and_terminal() {
        let (mut obs, log) = observer();
        obs.on_create_failure("boom");
        assert_eq!(obs.state(), NegotiationState::Failed);
        obs.on_create_success();
        obs.on_set_success();
        assert_eq!(obs.state(), NegotiationState::Failed);
        assert!(log.is_empty());
    }

    #[test]
    fn set_failure_keeps_only_the_created_line() {
        let (mut obs, log) = observer();
        obs.on_create_success();
        obs.on_set_failure("bad sdp");
        assert_eq!(obs.state(), NegotiationState::Failed);
        assert_eq!(log.snapshot(), vec![LOCAL_SDP_CREATED]);
    }

    #[test]
    fn set_success_before_creation_is_ignored() {
        let (mut obs, log) = observer();
        obs.on_set_success();
        assert_eq!(obs.state(), NegotiationState::AwaitingOfferCreation);
        assert!(log.is_empty());
    }
}
