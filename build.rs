fn main() {
    // Only the desktop shell needs the Tauri context (config, icons, capabilities).
    #[cfg(feature = "gui")]
    tauri_build::build()
}
