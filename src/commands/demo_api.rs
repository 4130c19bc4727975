use crate::event_log::EventLog;
use crate::shell::Shell;
use tauri::{command, AppHandle, Emitter, State};
use tokio::sync::Mutex;

/// Event carrying the full log snapshot to the webview
pub const LOG_EVENT: &str = "demo-log";

/// Managed state. Presses are serialized by the mutex.
pub struct DemoState {
    pub shell: Mutex<Shell>,
    pub log: EventLog,
}

impl DemoState {
    pub fn new(shell: Shell) -> Self {
        let log = shell.log().clone();
        Self {
            shell: Mutex::new(shell),
            log,
        }
    }
}

/// "Create PeerConn & Gather ICE" button
#[command]
pub async fn create_and_gather(state: State<'_, DemoState>) -> Result<(), String> {
    log::info!("create_and_gather called");
    let mut shell = state.shell.lock().await;
    shell.press().await.map_err(|e| {
        log::error!("create_and_gather failed: {}", e);
        e.to_string()
    })
}

#[command]
pub fn get_log(state: State<'_, DemoState>) -> Vec<String> {
    state.log.snapshot()
}

/// Pushes every log snapshot to the frontend.
pub fn forward_log(app: AppHandle, log: &EventLog) {
    let mut rx = log.subscribe();
    tauri::async_runtime::spawn(async move {
        while rx.changed().await.is_ok() {
            let lines = rx.borrow_and_update().clone();
            if let Err(e) = app.emit(LOG_EVENT, lines) {
                log::warn!("Failed to emit {}: {:?}", LOG_EVENT, e);
            }
        }
    });
}
