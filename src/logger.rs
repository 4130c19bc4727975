use crate::config;
use std::io::Write;

/// Installs the process logger: `RUST: [timestamp] LEVEL target - msg`.
///
/// `RUST_LOG` overrides the default filter. Calling this more than once is
/// harmless; only the first call installs anything.
pub fn init(enable_internal_tracer: bool) {
    if !config::LOGGING_ENABLED || !config::dev::ENABLE_LOGGING {
        return;
    }

    let engine_level = if enable_internal_tracer { "debug" } else { "warn" };
    let default_filter = format!(
        "info,webrtc={lvl},webrtc_ice={lvl},webrtc_mdns=warn",
        lvl = engine_level
    );

    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .format(|buf, record| {
        let now = chrono::Local::now();
        writeln!(
            buf,
            "RUST: [{}] {:<5} {} - {}",
            now.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    })
    .try_init();
}
