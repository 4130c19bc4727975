use crate::config::{FactoryOptions, InitializationOptions};
use crate::error::{DemoError, Result};
use crate::logger;
use crate::peer::state::{ENGINE, INIT_RUNS};
use std::sync::atomic::Ordering;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::setting_engine::SettingEngine;
use webrtc::api::{APIBuilder, API};
use webrtc::interceptor::registry::Registry;

/// What the one-time initialization set up.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub initialized_at: chrono::DateTime<chrono::Local>,
    pub internal_tracer: bool,
}

/// Runs the process-wide engine setup the first time it is called.
/// Later calls return the existing state and ignore `options`.
pub fn initialize(options: &InitializationOptions) -> &'static EngineInfo {
    ENGINE.get_or_init(|| {
        INIT_RUNS.fetch_add(1, Ordering::SeqCst);
        logger::init(options.enable_internal_tracer);
        log::info!(
            "Initializing WebRTC engine (internal tracer: {})",
            options.enable_internal_tracer
        );
        EngineInfo {
            initialized_at: chrono::Local::now(),
            internal_tracer: options.enable_internal_tracer,
        }
    })
}

pub fn is_initialized() -> bool {
    ENGINE.get().is_some()
}

pub fn initialization_count() -> usize {
    INIT_RUNS.load(Ordering::SeqCst)
}

/// Builds a peer connection factory with its own media engine.
pub fn build_factory(options: &FactoryOptions) -> Result<API> {
    if !is_initialized() {
        return Err(DemoError::Initialization(
            "engine must be initialized before building a factory".into(),
        ));
    }

    log::info!("Creating peer connection factory");
    let mut media_engine = MediaEngine::default();
    if options.register_default_codecs {
        media_engine
            .register_default_codecs()
            .map_err(|e| DemoError::Initialization(format!("register codecs: {e}")))?;
    }

    let mut registry = Registry::new();
    if options.register_default_interceptors {
        registry = register_default_interceptors(registry, &mut media_engine)
            .map_err(|e| DemoError::Initialization(format!("register interceptors: {e}")))?;
    }

    let mut setting_engine = SettingEngine::default();
    setting_engine.set_include_loopback_candidate(options.include_loopback_candidate);

    Ok(APIBuilder::new()
        .with_media_engine(media_engine)
        .with_interceptor_registry(registry)
        .with_setting_engine(setting_engine)
        .build())
}
