//! Current settings for both algorithms plus named presets.

use chrono::{DateTime, Utc};

use super::types::{Algorithm, Settings};
use crate::hsa::HsaSettings;
use crate::sa::SaSettings;

/// Snapshot of both algorithms' settings under a name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub sa: SaSettings,
    pub hsa: HsaSettings,
    pub created_at: DateTime<Utc>,
}

/// Editable settings with saved presets, newest first.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SettingsStore {
    sa: SaSettings,
    hsa: HsaSettings,
    presets: Vec<Preset>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sa(&self) -> &SaSettings {
        &self.sa
    }

    pub fn hsa(&self) -> &HsaSettings {
        &self.hsa
    }

    pub fn update_sa(&mut self, edit: impl FnOnce(&mut SaSettings)) {
        edit(&mut self.sa);
    }

    pub fn update_hsa(&mut self, edit: impl FnOnce(&mut HsaSettings)) {
        edit(&mut self.hsa);
    }

    pub fn reset_sa(&mut self) {
        self.sa = SaSettings::default();
    }

    pub fn reset_hsa(&mut self) {
        self.hsa = HsaSettings::default();
    }

    /// Current settings for `algorithm`, ready for an init request.
    pub fn settings_for(&self, algorithm: Algorithm) -> Settings {
        match algorithm {
            Algorithm::Sa => Settings::Sa(self.sa.clone()),
            Algorithm::Hsa => Settings::Hsa(self.hsa.clone()),
        }
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Saves the current settings. A blank name becomes `"Preset"`.
    pub fn save_preset(&mut self, name: &str) -> &Preset {
        let name = name.trim();
        let created_at = Utc::now();
        let preset = Preset {
            id: format!(
                "preset-{}-{}",
                created_at.timestamp_millis(),
                rand::random::<u32>() % 1_000_000
            ),
            name: if name.is_empty() { "Preset".to_string() } else { name.to_string() },
            sa: self.sa.clone(),
            hsa: self.hsa.clone(),
            created_at,
        };
        log::debug!("saved preset {} ({})", preset.name, preset.id);
        self.presets.insert(0, preset);
        &self.presets[0]
    }

    /// Loads a preset into the current settings; false if `id` is unknown.
    pub fn apply_preset(&mut self, id: &str) -> bool {
        match self.presets.iter().find(|p| p.id == id) {
            Some(preset) => {
                self.sa = preset.sa.clone();
                self.hsa = preset.hsa.clone();
                true
            }
            None => false,
        }
    }

    pub fn delete_preset(&mut self, id: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.id != id);
        self.presets.len() != before
    }
}
