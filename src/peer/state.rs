use crate::peer::engine::EngineInfo;
use once_cell::sync::OnceCell;
use std::sync::atomic::AtomicUsize;

/// ========== GLOBAL STATE ==========

/// Process-wide engine, set by the first session
pub static ENGINE: OnceCell<EngineInfo> = OnceCell::new();

/// How many times the initializer body actually ran
pub static INIT_RUNS: AtomicUsize = AtomicUsize::new(0);
