use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::shared::config::model::{Settings, load_settings};

/// Job settings read once from `FILECRUSH_CONFIG` (default `config/crush`).
pub static CONFIG: Lazy<Arc<Settings>> = Lazy::new(|| {
    Arc::new(load_settings().expect("Failed to load crush configuration"))
});
