use crate::peer::types::IceCandidate;
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_gatherer_state::RTCIceGathererState;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::signaling_state::RTCSignalingState;

/// Lifecycle notifications coming out of a peer connection.
///
/// `IceConnectionReceivingChange`, `IceCandidatesRemoved` and `StreamRemoved`
/// are part of the observer contract but the webrtc-rs engine has no
/// callback that produces them.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerEvent {
    SignalingChange(RTCSignalingState),
    IceConnectionChange(RTCIceConnectionState),
    IceConnectionReceivingChange(bool),
    IceGatheringChange(RTCIceGathererState),
    IceCandidate(IceCandidate),
    /// End-of-candidates marker (the engine reports a `None` candidate).
    IceGatheringComplete,
    IceCandidatesRemoved(Vec<IceCandidate>),
    StreamAdded { stream_id: String },
    StreamRemoved { stream_id: String },
    DataChannel { label: String },
    RenegotiationNeeded,
    ConnectionStateChange(RTCPeerConnectionState),
}

impl PeerEvent {
    /// Callback name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            PeerEvent::SignalingChange(_) => "onSignalingChange",
            PeerEvent::IceConnectionChange(_) => "onIceConnectionChange",
            PeerEvent::IceConnectionReceivingChange(_) => "onIceConnectionReceivingChange",
            PeerEvent::IceGatheringChange(_) => "onIceGatheringChange",
            PeerEvent::IceCandidate(_) => "onIceCandidate",
            PeerEvent::IceGatheringComplete => "onIceGatheringComplete",
            PeerEvent::IceCandidatesRemoved(_) => "onIceCandidatesRemoved",
            PeerEvent::StreamAdded { .. } => "onAddStream",
            PeerEvent::StreamRemoved { .. } => "onRemoveStream",
            PeerEvent::DataChannel { .. } => "onDataChannel",
            PeerEvent::RenegotiationNeeded => "onRenegotiationNeeded",
            PeerEvent::ConnectionStateChange(_) => "onConnectionChange",
        }
    }
}
