//! Player preferences
//!
//! Persisted separately from progress, through the same storage backend.

use serde::{Deserialize, Serialize};

use crate::store::StorageBackend;

/// Which pointer event drops the next gear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputModality {
    /// Mouse/pen: place on press
    #[default]
    Pointer,
    /// Touch screen: place on release, so the finger can aim first
    Touch,
}

impl InputModality {
    pub fn from_touch_primary(touch_primary: bool) -> Self {
        if touch_primary {
            InputModality::Touch
        } else {
            InputModality::Pointer
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Input modality; picked from device detection on first run
    pub modality: InputModality,
    /// Show the ghost gear at its predicted landing spot
    pub show_preview: bool,
    /// Show the vertical drop guide under the pointer
    pub show_guide: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            modality: InputModality::Pointer,
            show_preview: true,
            show_guide: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "gearChainSettings";

    /// Load settings, falling back to defaults
    pub fn load(storage: &dyn StorageBackend) -> Self {
        if let Ok(Some(json)) = storage.read(Self::STORAGE_KEY) {
            if let Ok(settings) = serde_json::from_str(&json) {
                log::info!("Loaded settings");
                return settings;
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings; failures are logged only
    pub fn save(&self, storage: &mut dyn StorageBackend) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.write(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {}", e),
            },
            Err(e) => log::warn!("Settings not serialized: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    #[test]
    fn test_settings_roundtrip_through_storage() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            modality: InputModality::Touch,
            show_preview: false,
            show_guide: true,
        };
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_garbage_settings_use_default() {
        let storage = MemoryStorage::new().with_item("gearChainSettings", "][");
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_modality_from_touch_flag() {
        assert_eq!(InputModality::from_touch_primary(true), InputModality::Touch);
        assert_eq!(InputModality::from_touch_primary(false), InputModality::Pointer);
    }
}
