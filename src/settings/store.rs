use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::filter::types::{FilterKind, NormalizedValue};
use crate::settings::types::FilterSettings;

/// Quiet period after the last change before settings hit the disk.
const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Persistent filter settings with debounced saving.
pub struct SettingsStore {
    path: PathBuf,
    data: Mutex<FilterSettings>,
    save_notify: Notify,
    is_dirty: AtomicBool,
}

impl SettingsStore {
    /// Create a new store, loading from disk if the file exists.
    ///
    /// An unreadable or corrupt file is logged and replaced by defaults.
    pub fn new(path: PathBuf) -> Self {
        let data = Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable settings at {}: {e}", path.display());
            FilterSettings::default()
        });
        Self {
            path,
            data: Mutex::new(data),
            save_notify: Notify::new(),
            is_dirty: AtomicBool::new(false),
        }
    }

    /// Load settings from a JSON file, returning default on missing file.
    pub fn load(path: &Path) -> Result<FilterSettings, String> {
        if !path.exists() {
            return Ok(FilterSettings::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    }

    /// Save current settings to disk atomically (write .tmp then rename).
    pub fn save(&self) -> Result<(), String> {
        let data = self.data.lock().clone();
        let json = serde_json::to_string_pretty(&data).map_err(|e| e.to_string())?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| e.to_string())?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| e.to_string())?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current in-memory settings.
    pub fn get(&self) -> FilterSettings {
        self.data.lock().clone()
    }

    /// Record a slider position. Triggers a debounced save.
    pub fn set_position(&self, kind: FilterKind, position: NormalizedValue) {
        self.data
            .lock()
            .positions
            .insert(kind.as_id_str().to_string(), position.value());
        self.mark_dirty();
    }

    /// Record the enable switch. Triggers a debounced save.
    pub fn set_enabled(&self, enabled: bool) {
        self.data.lock().enabled = enabled;
        self.mark_dirty();
    }

    /// Forget all saved positions and re-enable the filters.
    pub fn clear(&self) {
        *self.data.lock() = FilterSettings::default();
        self.mark_dirty();
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty.load(Ordering::Acquire)
    }

    fn mark_dirty(&self) {
        self.is_dirty.store(true, Ordering::Release);
        self.save_notify.notify_one();
    }

    /// Start the debounce task: waits for a dirty notification, sleeps, then
    /// saves. Must be called from within a tokio runtime.
    ///
    /// Uses an `AtomicBool` dirty flag to avoid losing notifications that arrive
    /// between `save()` completing and `notified().await` re-registering.
    pub fn start_debounce_task(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                store.save_notify.notified().await;
                tokio::time::sleep(SAVE_DEBOUNCE).await;
                if store.is_dirty.swap(false, Ordering::AcqRel) {
                    if let Err(e) = store.save() {
                        tracing::warn!("Failed to save filter settings: {e}");
                    }
                }
            }
        })
    }
}
