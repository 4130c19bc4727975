use crate::config::{GatheringPolicy, OfferConstraints, SessionConfig};
use crate::error::{DemoError, Result};
use crate::peer::events::PeerEvent;
use crate::peer::types::{IceCandidate, ServerConfig};
use crate::utils::add_ice_url_scheme;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use webrtc::api::API;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;

/// Creates a peer connection and wires every callback into an event stream.
pub async fn new_peer(
    api: &API,
    config: &SessionConfig,
    connection_id: &str,
) -> Result<(Arc<RTCPeerConnection>, UnboundedReceiver<PeerEvent>)> {
    log::info!("Creating peer connection {}", connection_id);
    let pc = api
        .new_peer_connection(rtc_config(config))
        .await
        .map_err(|e| DemoError::Initialization(e.to_string()))?;
    let pc = Arc::new(pc);

    let (tx, rx) = mpsc::unbounded_channel();
    register_handlers(&pc, tx, connection_id.to_owned());
    log::info!("Created peer connection {}", connection_id);
    Ok((pc, rx))
}

/// Every handler pushes synchronously, so each callback stream keeps its order.
fn register_handlers(
    pc: &RTCPeerConnection,
    tx: UnboundedSender<PeerEvent>,
    connection_id: String,
) {
    let events = tx.clone();
    pc.on_signaling_state_change(Box::new(move |state| {
        let _ = events.send(PeerEvent::SignalingChange(state));
        Box::pin(async {})
    }));

    let events = tx.clone();
    pc.on_ice_connection_state_change(Box::new(move |state| {
        let _ = events.send(PeerEvent::IceConnectionChange(state));
        Box::pin(async {})
    }));

    let events = tx.clone();
    pc.on_ice_gathering_state_change(Box::new(move |state| {
        let _ = events.send(PeerEvent::IceGatheringChange(state));
        Box::pin(async {})
    }));

    let events = tx.clone();
    pc.on_ice_candidate(Box::new(move |cand: Option<RTCIceCandidate>| {
        match cand {
            Some(c) => {
                let candidate = IceCandidate::from_rtc(&c, &connection_id).unwrap_or_else(|e| {
                    log::warn!("Could not serialize ICE candidate {}: {}", c, e);
                    IceCandidate::unserialized(&c, &connection_id)
                });
                let _ = events.send(PeerEvent::IceCandidate(candidate));
            }
            // None marks the end of gathering
            None => {
                let _ = events.send(PeerEvent::IceGatheringComplete);
            }
        }
        Box::pin(async {})
    }));

    let events = tx.clone();
    pc.on_track(Box::new(move |track, _receiver, _transceiver| {
        let _ = events.send(PeerEvent::StreamAdded {
            stream_id: track.stream_id(),
        });
        Box::pin(async {})
    }));

    let events = tx.clone();
    pc.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
        let _ = events.send(PeerEvent::DataChannel {
            label: dc.label().to_owned(),
        });
        Box::pin(async {})
    }));

    let events = tx.clone();
    pc.on_negotiation_needed(Box::new(move || {
        let _ = events.send(PeerEvent::RenegotiationNeeded);
        Box::pin(async {})
    }));

    let events = tx;
    pc.on_peer_connection_state_change(Box::new(move |state| {
        let _ = events.send(PeerEvent::ConnectionStateChange(state));
        Box::pin(async {})
    }));
}

/// Builds the configuration for a new peer connection
pub fn rtc_config(config: &SessionConfig) -> RTCConfiguration {
    match config.gathering_policy {
        // The engine gathers once per local description and never re-gathers
        // on network changes, so there is nothing to switch on.
        GatheringPolicy::GatherOnce => {}
    }

    RTCConfiguration {
        ice_servers: ice_servers(&config.ice_servers),
        ..Default::default()
    }
}

pub fn ice_servers(servers: &[ServerConfig]) -> Vec<RTCIceServer> {
    servers
        .iter()
        .map(|config| RTCIceServer {
            urls: vec![add_ice_url_scheme(config)],
            username: config.username.clone().unwrap_or_default(),
            credential: config.credential.clone().unwrap_or_default(),
            ..Default::default()
        })
        .collect()
}

/// Offer constraints become receive-only transceivers, one per requested kind.
pub async fn apply_offer_constraints(
    pc: &RTCPeerConnection,
    constraints: &OfferConstraints,
) -> Result<()> {
    let kinds = [
        (constraints.offer_to_receive_audio, RTPCodecType::Audio),
        (constraints.offer_to_receive_video, RTPCodecType::Video),
    ];
    for (wanted, kind) in kinds {
        if !wanted {
            continue;
        }
        pc.add_transceiver_from_kind(
            kind,
            Some(RTCRtpTransceiverInit {
                direction: RTCRtpTransceiverDirection::Recvonly,
                send_encodings: vec![],
            }),
        )
        .await?;
        log::debug!("Added recvonly {} transceiver", kind);
    }
    Ok(())
}
