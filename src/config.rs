//! Runtime configuration.
//!
//! Settings load from an optional TOML file — the path in the
//! `EDUNEXUS_CONFIG` environment variable, or `edunexus.toml` inside the
//! data directory — with hard defaults for anything unset. A missing file
//! is not an error; a present-but-unparsable file is.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Resolved runtime configuration for the catalog service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for the catalog snapshot and the file store.
    pub data_dir: PathBuf,
    /// Resources per result page.
    pub page_size: usize,
    /// How many exact-match-filtered rows to over-fetch when a free-text
    /// term must be matched in memory. Matches beyond this window are
    /// missed; raise it to trade memory for recall.
    pub candidate_window: usize,
    /// Maximum autocomplete suggestions returned per lookup.
    pub suggestion_limit: usize,
    /// How many title-ordered rows a suggestion lookup scans.
    pub suggestion_scan_limit: usize,
    /// Free-text terms shorter than this never narrow a search and never
    /// trigger a store read for suggestions.
    pub min_term_len: usize,
    /// Upper bound on a single record-store operation.
    pub store_timeout: Duration,
    /// Quiet period before a pending suggestion lookup fires.
    pub suggestion_debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            page_size: 12,
            candidate_window: 96,
            suggestion_limit: 8,
            suggestion_scan_limit: 512,
            min_term_len: 2,
            store_timeout: Duration::from_secs(10),
            suggestion_debounce: Duration::from_millis(300),
        }
    }
}

/// On-disk shape: every field optional, durations in milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    page_size: Option<usize>,
    candidate_window: Option<usize>,
    suggestion_limit: Option<usize>,
    suggestion_scan_limit: Option<usize>,
    min_term_len: Option<usize>,
    store_timeout_ms: Option<u64>,
    suggestion_debounce_ms: Option<u64>,
}

impl Config {
    /// Load configuration, merging the TOML file (if any) over defaults.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os("EDUNEXUS_CONFIG").map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| default_data_dir().join("edunexus.toml"));

        if !path.exists() {
            if explicit.is_some() {
                anyhow::bail!("EDUNEXUS_CONFIG points at {}, which does not exist", path.display());
            }
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(Self::default().merged(file))
    }

    fn merged(mut self, file: ConfigFile) -> Self {
        if let Some(dir) = file.data_dir {
            self.data_dir = dir;
        }
        if let Some(n) = file.page_size {
            self.page_size = n.max(1);
        }
        if let Some(n) = file.candidate_window {
            self.candidate_window = n;
        }
        if let Some(n) = file.suggestion_limit {
            self.suggestion_limit = n;
        }
        if let Some(n) = file.suggestion_scan_limit {
            self.suggestion_scan_limit = n;
        }
        if let Some(n) = file.min_term_len {
            self.min_term_len = n;
        }
        if let Some(ms) = file.store_timeout_ms {
            self.store_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = file.suggestion_debounce_ms {
            self.suggestion_debounce = Duration::from_millis(ms);
        }
        // The candidate window must cover at least one page plus the
        // over-fetch row, or free-text pagination degenerates.
        self.candidate_window = self.candidate_window.max(self.page_size + 1);
        self
    }
}

/// Platform data directory, falling back to a dotted directory in cwd.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("edunexus"))
        .unwrap_or_else(|| PathBuf::from(".edunexus"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        check!(config.page_size == 12);
        check!(config.candidate_window > config.page_size);
        check!(config.suggestion_limit == 8);
        check!(config.min_term_len == 2);
        check!(config.suggestion_debounce == Duration::from_millis(300));
    }

    #[test]
    fn file_overrides_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edunexus.toml");
        std::fs::write(
            &path,
            "page_size = 20\nstore_timeout_ms = 2500\nsuggestion_limit = 5\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        check!(config.page_size == 20);
        check!(config.store_timeout == Duration::from_millis(2500));
        check!(config.suggestion_limit == 5);
        // Untouched fields keep defaults.
        check!(config.min_term_len == 2);
    }

    #[test]
    fn candidate_window_never_below_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edunexus.toml");
        std::fs::write(&path, "page_size = 50\ncandidate_window = 10\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        check!(config.candidate_window == 51);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edunexus.toml");
        std::fs::write(&path, "page_sizee = 20\n").unwrap();

        check!(Config::load_from(&path).is_err());
    }
}
