//! Runtime configuration shared across the orchestrator and workers.

use std::env;
use std::path::PathBuf;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Key under which the session is stored and replicated
    pub session_id: String,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Requests from observers waiting for the host
    pub request_buffer_size: usize,
    /// Leave defeated combatants out of the turn order
    pub skip_defeated: bool,
    /// Store sessions on disk instead of in memory
    pub enable_persistence: bool,
    /// Overrides the platform data directory for saved sessions
    pub save_data_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            session_id: "default".to_owned(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            request_buffer_size: 32,
            skip_defeated: false,
            enable_persistence: false,
            save_data_dir: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables, keeping defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Unset or invalid values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(session_id) = lookup("COMBAT_SESSION_ID")
            && !session_id.trim().is_empty()
        {
            config.session_id = session_id.trim().to_owned();
        }

        // Channel configuration
        if let Some(capacity) = read_value::<usize>(&lookup, "COMBAT_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_value::<usize>(&lookup, "COMBAT_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_value::<usize>(&lookup, "COMBAT_REQUEST_BUFFER") {
            config.request_buffer_size = capacity.max(1);
        }

        if let Some(skip) = read_flag(&lookup, "COMBAT_SKIP_DEFEATED") {
            config.skip_defeated = skip;
        }
        if let Some(enable) = read_flag(&lookup, "ENABLE_PERSISTENCE") {
            config.enable_persistence = enable;
        }

        if let Some(dir) = lookup("SAVE_DATA_DIR")
            && !dir.trim().is_empty()
        {
            config.save_data_dir = Some(PathBuf::from(dir.trim()));
        }

        config
    }

    /// Directory saved sessions live in.
    ///
    /// Falls back to the platform data directory when `save_data_dir` is not
    /// set. Returns `None` if neither is available.
    pub fn sessions_dir(&self) -> Option<PathBuf> {
        self.save_data_dir.clone().or_else(|| {
            directories::ProjectDirs::from("", "", "combat-tracker")
                .map(|dirs| dirs.data_dir().join("sessions"))
        })
    }
}

fn read_value<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

fn read_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    match lookup(key)?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
