use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DealflowError, Result};

/// Top-level configuration for the Dealflow assistant core.
///
/// Loaded from `~/.dealflow/config.toml` by default. Each section corresponds
/// to one subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealflowConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub autosend: AutoSendConfig,
}

impl DealflowConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DealflowConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DealflowError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Subscription tier, as its snake_case wire name.
    pub plan_tier: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            plan_tier: "starter".to_string(),
        }
    }
}

impl GeneralConfig {
    /// The configured plan tier. An unrecognized name falls back to the
    /// lowest tier rather than failing the whole config load.
    pub fn tier(&self) -> crate::types::PlanTier {
        self.plan_tier
            .parse()
            .unwrap_or(crate::types::PlanTier::Starter)
    }
}

/// Settings for the action catalog and recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    /// Cap on the number of recommended actions returned for a deal.
    pub max_recommendations: usize,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 6,
        }
    }
}

/// Settings for the asynchronous job watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Interval between status polls for a watched job.
    pub poll_interval_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1,
        }
    }
}

/// Auto-send policy for assistant-drafted outbound messages.
///
/// Thresholds are on the user-facing 0-100 scale; the gate compares against
/// `threshold_fraction()` internally. A situation with no entry falls back to
/// `default_threshold` with auto-send disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoSendConfig {
    /// Master switch. When false, nothing is auto-sent regardless of
    /// per-situation settings.
    pub enabled: bool,
    /// Fallback threshold (0-100) for situations without an explicit entry.
    pub default_threshold: f32,
    /// Per-situation policy, keyed by the situation's snake_case name.
    #[serde(default)]
    pub situations: BTreeMap<String, SituationPolicy>,
}

impl Default for AutoSendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_threshold: 85.0,
            situations: BTreeMap::new(),
        }
    }
}

impl AutoSendConfig {
    /// Policy for a situation, falling back to the disabled default.
    pub fn policy_for(&self, situation: &str) -> SituationPolicy {
        self.situations
            .get(situation)
            .cloned()
            .unwrap_or(SituationPolicy {
                enabled: false,
                threshold: self.default_threshold,
            })
    }
}

/// Per-situation auto-send switch and confidence threshold (0-100).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SituationPolicy {
    pub enabled: bool,
    pub threshold: f32,
}

impl SituationPolicy {
    /// The threshold converted to the internal 0-1 confidence scale.
    pub fn threshold_fraction(&self) -> f32 {
        (self.threshold / 100.0).clamp(0.0, 1.0)
    }
}
