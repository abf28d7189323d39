//! Utility functions for dmxpatch

use std::env;
use std::path::PathBuf;

/// Get the directory holding the persisted tool state
///
/// Resolution order follows the XDG Base Directory Specification:
/// `DMXPATCH_STATE` override, then `XDG_DATA_HOME`, then
/// `~/.local/share/dmxpatch`, with the temp directory as a last resort.
pub fn get_state_dir() -> PathBuf {
    if let Ok(state_dir) = env::var("DMXPATCH_STATE") {
        return PathBuf::from(state_dir);
    }

    if let Ok(xdg_data) = env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data).join("dmxpatch");
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".local/share/dmxpatch");
    }

    env::temp_dir().join("dmxpatch")
}

/// Shorten a URL to host + path for compact listing output
///
/// Keeps the original string when it does not look like a URL.
pub fn short_url(url: &str) -> String {
    let trimmed = url.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));

    match rest {
        Some(rest) => rest.trim_end_matches('/').to_string(),
        None => trimmed.to_string(),
    }
}
