//! Configuration persistence.
//!
//! Saves and loads session line configurations (plus the mock-mode flag) as a
//! JSON file in the working directory. Frontend-only; one-shot CLI actions do
//! not touch this file.
//!
//! When the application is started with `--no-config-cache`, all save/load
//! operations are skipped. This keeps E2E runs free of cache interference;
//! call `set_no_cache(true)` early in startup to enable it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::session::{SerialSessionConfig, SessionMode};

/// Global flag to disable config cache (set via --no-config-cache)
static NO_CONFIG_CACHE: AtomicBool = AtomicBool::new(false);

/// Set the no-cache flag (should be called early in startup).
pub fn set_no_cache(enabled: bool) {
    NO_CONFIG_CACHE.store(enabled, Ordering::SeqCst);
    if enabled {
        log::info!("Config cache disabled (--no-config-cache)");
    }
}

fn is_no_cache() -> bool {
    NO_CONFIG_CACHE.load(Ordering::SeqCst)
}

/// Persisted per-session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSessionConfig {
    pub id: String,
    pub config: SerialSessionConfig,
}

/// On-disk document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedPanelConfig {
    pub mock_mode: bool,
    pub sessions: Vec<PersistedSessionConfig>,
}

/// The configuration file lives in the working directory for cross-platform
/// compatibility.
fn get_config_path() -> Result<PathBuf> {
    let config_dir = std::env::current_dir().context("Failed to get current working directory")?;
    Ok(config_dir.join("obsdeck_config.json"))
}

/// Save session configurations and the mock-mode flag to disk.
///
/// Skipped when `--no-config-cache` is set.
pub fn save_panel_config(mode: SessionMode, configs: &HashMap<String, SerialSessionConfig>) -> Result<()> {
    if is_no_cache() {
        log::debug!("Skipping config save (--no-config-cache enabled)");
        return Ok(());
    }

    let path = get_config_path()?;

    let mut sessions: Vec<PersistedSessionConfig> = configs
        .iter()
        .map(|(id, config)| PersistedSessionConfig {
            id: id.clone(),
            config: config.clone(),
        })
        .collect();
    sessions.sort_by(|a, b| a.id.cmp(&b.id));

    let doc = PersistedPanelConfig {
        mock_mode: mode == SessionMode::Mock,
        sessions,
    };

    let json = serde_json::to_string_pretty(&doc).context("Failed to serialize panel config")?;
    fs::write(&path, json).with_context(|| format!("Failed to write config to {path:?}"))?;

    log::debug!("Saved {} session configuration(s) to {path:?}", configs.len());
    Ok(())
}

/// Load session configurations from disk. Returns defaults when skipped or
/// when no file exists.
pub fn load_panel_config() -> Result<(SessionMode, HashMap<String, SerialSessionConfig>)> {
    if is_no_cache() {
        log::debug!("Skipping config load (--no-config-cache enabled)");
        return Ok((SessionMode::Hardware, HashMap::new()));
    }

    let path = get_config_path()?;

    if !path.exists() {
        log::debug!("No saved config found at {path:?}");
        return Ok((SessionMode::Hardware, HashMap::new()));
    }

    let json =
        fs::read_to_string(&path).with_context(|| format!("Failed to read config from {path:?}"))?;
    let doc: PersistedPanelConfig =
        serde_json::from_str(&json).context("Failed to deserialize panel config")?;

    let mode = if doc.mock_mode {
        SessionMode::Mock
    } else {
        SessionMode::Hardware
    };
    let configs = doc
        .sessions
        .into_iter()
        .map(|s| (s.id, s.config))
        .collect();

    log::info!("Loaded panel configuration from {path:?}");
    Ok((mode, configs))
}
