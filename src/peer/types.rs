use serde::{Deserialize, Serialize};
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;

/// Local ICE candidate as reported by the engine
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IceCandidate {
    /// SDP `candidate:` line
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_mline_index: Option<u16>,
    pub connection_id: String, // session the candidate belongs to
}

impl IceCandidate {
    pub fn from_rtc(cand: &RTCIceCandidate, connection_id: &str) -> webrtc::error::Result<Self> {
        let init = cand.to_json()?;
        Ok(Self {
            candidate: init.candidate,
            sdp_mid: init.sdp_mid,
            sdp_mline_index: init.sdp_mline_index,
            connection_id: connection_id.to_owned(),
        })
    }

    /// Fallback when the engine cannot produce the SDP form; keeps the
    /// engine's own description so the candidate is still reported.
    pub fn unserialized(cand: &RTCIceCandidate, connection_id: &str) -> Self {
        Self {
            candidate: cand.to_string(),
            sdp_mid: None,
            sdp_mline_index: None,
            connection_id: connection_id.to_owned(),
        }
    }
}


/// ICE server entry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub id: String,
    pub r#type: String, // 'stun' or 'turn'
    pub url: String,
    pub username: Option<String>,
    pub credential: Option<String>,
}
