pub mod config;
pub mod error;
pub mod event_log;
pub mod logger;
pub mod peer;
pub mod session;
pub mod shell;
pub mod utils;

#[cfg(feature = "gui")]
mod commands;

pub use config::SessionConfig;
pub use error::{DemoError, Result};
pub use event_log::{EventLog, EventSink};
pub use session::{Session, SessionState};
pub use shell::Shell;

#[cfg(feature = "gui")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::demo_api::{self, DemoState};
    use tauri::Manager;

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(DemoState::new(Shell::new(SessionConfig::default())))
        .setup(|app| {
            let state = app.state::<DemoState>();
            demo_api::forward_log(app.handle().clone(), &state.log);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            demo_api::create_and_gather,
            demo_api::get_log,
        ])
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(e) => {
            log::error!("error while building tauri application: {}", e);
            return;
        }
    };

    app.run(|handle, event| {
        if let tauri::RunEvent::Exit = event {
            let state = handle.state::<DemoState>();
            tauri::async_runtime::block_on(async {
                if let Err(e) = state.shell.lock().await.shutdown().await {
                    log::warn!("Shutdown dispose failed: {}", e);
                }
            });
        }
    });
}
