// Application configuration.
// Logging can only be switched off by hand in debug builds.

use crate::error::{DemoError, Result};
use crate::peer::types::ServerConfig;
use crate::utils::add_ice_url_scheme;
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
pub const LOGGING_ENABLED: bool = true; // on in debug builds

#[cfg(not(debug_assertions))]
pub const LOGGING_ENABLED: bool = false; // off in release builds

// Extra switches for development builds
#[cfg(debug_assertions)]
pub mod dev {
    // Set to false to silence logging completely in a debug build.
    // Has no effect in release builds.
    pub const ENABLE_LOGGING: bool = true;
}

#[cfg(not(debug_assertions))]
pub mod dev {
    pub const ENABLE_LOGGING: bool = false;
}

/// Publicly reachable STUN servers that need no credentials.
pub const DEFAULT_STUN_SERVERS: [(&str, &str); 2] = [
    // Google
    ("google-stun", "stun:stun1.l.google.com:19302"),
    // Nextcloud
    ("nextcloud-stun", "stun:stun.nextcloud.com:443"),
];

/// How long the engine keeps gathering after the first pass.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GatheringPolicy {
    /// Gather once per offer; no re-gathering on network changes.
    #[default]
    GatherOnce,
}

/// Media the local offer asks to receive.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferConstraints {
    pub offer_to_receive_audio: bool,
    pub offer_to_receive_video: bool,
}

impl Default for OfferConstraints {
    fn default() -> Self {
        Self {
            offer_to_receive_audio: true,
            offer_to_receive_video: false,
        }
    }
}

/// Options used when building a per-session factory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FactoryOptions {
    pub register_default_codecs: bool,
    pub register_default_interceptors: bool,
    /// Also report 127.0.0.1 host candidates.
    pub include_loopback_candidate: bool,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            register_default_codecs: true,
            register_default_interceptors: true,
            include_loopback_candidate: false,
        }
    }
}

/// Process-wide engine options. Only the first session's options take effect.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InitializationOptions {
    /// Raise the engine's own log targets to debug.
    pub enable_internal_tracer: bool,
}

impl Default for InitializationOptions {
    fn default() -> Self {
        Self {
            enable_internal_tracer: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub ice_servers: Vec<ServerConfig>,
    pub gathering_policy: GatheringPolicy,
    pub offer: OfferConstraints,
    pub factory: FactoryOptions,
    pub init: InitializationOptions,
}

impl Default for SessionConfig {
    /// The fixed two-server STUN setup.
    fn default() -> Self {
        Self {
            ice_servers: default_ice_servers(),
            gathering_policy: GatheringPolicy::default(),
            offer: OfferConstraints::default(),
            factory: FactoryOptions::default(),
            init: InitializationOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Checks the ICE server list. TURN relays are not supported.
    pub fn validate(&self) -> Result<()> {
        if self.ice_servers.is_empty() {
            return Err(DemoError::InvalidConfig(
                "at least one STUN server is required".into(),
            ));
        }

        for server in &self.ice_servers {
            if server.url.trim().is_empty() {
                return Err(DemoError::InvalidConfig(format!(
                    "server {} has an empty URL",
                    server.id
                )));
            }
            if server.r#type == "turn" || server.url.starts_with("turn:") {
                return Err(DemoError::InvalidConfig(format!(
                    "server {} is a TURN relay, only STUN is supported",
                    server.id
                )));
            }
            let url = add_ice_url_scheme(server);
            if !url.starts_with("stun:") {
                return Err(DemoError::InvalidConfig(format!(
                    "server {} has unsupported URL {}",
                    server.id, url
                )));
            }
        }
        Ok(())
    }
}

pub fn default_ice_servers() -> Vec<ServerConfig> {
    DEFAULT_STUN_SERVERS
        .iter()
        .map(|(id, url)| ServerConfig {
            id: (*id).into(),
            r#type: "stun".into(),
            url: (*url).into(),
            username: None,
            credential: None,
        })
        .collect()
}
