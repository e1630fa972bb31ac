use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::registry::{MetricId, ThresholdOverride};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    /// Per-metric threshold overrides, keyed by metric id. Partial records
    /// merged over the built-in registry defaults.
    #[serde(default)]
    pub thresholds: BTreeMap<String, ThresholdOverride>,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub quality_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub dedupe_categories: bool,
    /// 0 means no limit.
    #[serde(default)]
    pub max_insights: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub snapshot_path: Option<String>,
    pub quality_path: Option<String>,
    pub dedupe_categories: Option<bool>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/finsight/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(snapshot_path) = overrides.snapshot_path {
            self.snapshot.path = snapshot_path;
        }
        if let Some(quality_path) = overrides.quality_path {
            self.snapshot.quality_path = quality_path;
        }
        if let Some(dedupe) = overrides.dedupe_categories {
            self.engine.dedupe_categories = dedupe;
        }
    }

    /// Threshold overrides keyed by parsed metric id. Keys that do not
    /// parse are skipped; an override for an unknown metric cannot apply
    /// to anything anyway.
    pub fn threshold_overrides(&self) -> BTreeMap<MetricId, ThresholdOverride> {
        let mut parsed = BTreeMap::new();
        for (key, overrides) in &self.thresholds {
            if let Ok(metric) = MetricId::from_str(key) {
                parsed.insert(metric, *overrides);
            }
        }
        parsed
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_snapshot_path(&self) -> PathBuf {
        expand_tilde(&self.snapshot.path)
    }

    pub fn resolved_quality_path(&self) -> Option<PathBuf> {
        if self.snapshot.quality_path.trim().is_empty() {
            None
        } else {
            Some(expand_tilde(&self.snapshot.quality_path))
        }
    }

    pub fn default_template() -> String {
        let template = r#"[snapshot]
path = "~/.local/share/finsight/snapshot.json"
quality_path = ""

[engine]
dedupe_categories = false
max_insights = 0

[server]
host = "127.0.0.1"
port = 3001

# Partial per-metric overrides, merged over the built-in defaults.
# [thresholds.liquidityMonths]
# warning = 9.0
# critical = 4.0
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dedupe_categories: false,
            max_insights: 0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}
