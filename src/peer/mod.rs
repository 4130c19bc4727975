pub mod connection;
pub mod engine;
pub mod events;
pub mod ice;
pub mod negotiation;
pub mod observer;
pub mod state;
pub mod types;

pub use engine::{initialization_count, initialize, EngineInfo};
pub use events::PeerEvent;
pub use negotiation::{NegotiationObserver, NegotiationState};
pub use observer::SignalingObserver;
pub use types::{IceCandidate, ServerConfig};
