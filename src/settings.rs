use crate::api::CurrentSettings;
use std::collections::HashMap;

/// Result of one settings fetch for one inverter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    /// The gateway returned fresh values.
    Current(CurrentSettings),
    /// The gateway has not collected settings for this inverter yet (503).
    NotReady,
    /// The fetch failed; the message is what the operator should see.
    Failed(String),
}

/// Most recently fetched settings per inverter serial.
///
/// Presence in the map is the only "known" signal. An inverter with no entry
/// renders as unknown; entries are never default-initialised. A NotReady
/// outcome removes any stale entry, because the latest fetch reported that
/// no collected value exists.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    entries: HashMap<String, CurrentSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, serialno: &str) -> Option<&CurrentSettings> {
        self.entries.get(serialno)
    }

    pub fn apply(&mut self, serialno: &str, outcome: &SettingsOutcome) {
        match outcome {
            SettingsOutcome::Current(settings) => {
                self.entries.insert(serialno.to_string(), settings.clone());
            }
            SettingsOutcome::NotReady => {
                self.entries.remove(serialno);
            }
            // A failed fetch keeps whatever we knew before
            SettingsOutcome::Failed(_) => {}
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
