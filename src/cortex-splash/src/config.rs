//! Persisted splash preferences and the first-run marker.
//!
//! Loading never fails: a missing or unreadable config falls back to
//! defaults, and environment-level accessibility signals are applied on top
//! of whatever was stored, always winning. Saving is explicit and only
//! happens on user action (the "disable forever" key).

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::env::EnvSource;
use crate::error::{Error, Result};

/// Environment override for the splash config directory.
const CONFIG_DIR_ENV: &str = "CORTEX_SPLASH_DIR";

/// Config file and marker names inside the config directory.
const CONFIG_FILE: &str = "splash.json";
const MARKER_FILE: &str = ".splash_shown";

/// Probability of showing the splash under the `random` frequency policy.
const RANDOM_SHOW_CHANCE: f64 = 0.1;

/// How often the splash should appear across runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplashFrequency {
    /// Show on every run.
    Always,
    /// Show on the first run only.
    #[default]
    First,
    /// Show on a small random sample of runs.
    Random,
    /// Never show.
    Never,
}

/// Persisted splash preferences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Master enable flag.
    pub splash_enabled: bool,
    /// Frequency policy.
    pub splash_frequency: SplashFrequency,
    /// Accessibility: skip all motion when set.
    pub reduced_motion: bool,
    /// Color preference: `truecolor`, `256`, `16`, or `auto`.
    pub color_mode: String,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            splash_enabled: true,
            splash_frequency: SplashFrequency::First,
            reduced_motion: false,
            color_mode: "auto".to_string(),
        }
    }
}

/// On-disk store for the config file and the first-run marker.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    config_path: PathBuf,
    marker_path: PathBuf,
}

impl ConfigStore {
    /// Creates a store rooted at the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            config_path: dir.join(CONFIG_FILE),
            marker_path: dir.join(MARKER_FILE),
        }
    }

    /// Creates a store at the platform config location, honoring the
    /// `CORTEX_SPLASH_DIR` override.
    pub fn from_env(env: &dyn EnvSource) -> Result<Self> {
        if let Some(dir) = env.var(CONFIG_DIR_ENV) {
            debug!(dir, "using splash config dir override");
            return Ok(Self::new(PathBuf::from(dir)));
        }

        let base = dirs::config_dir().ok_or(Error::ConfigDirNotFound)?;
        Ok(Self::new(base.join("cortex")))
    }

    /// Loads the stored config, falling back to defaults on any failure,
    /// then applies environment accessibility overrides.
    pub fn load(&self, env: &dyn EnvSource) -> SplashConfig {
        let mut config = match fs::read_to_string(&self.config_path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|err| {
                warn!(path = %self.config_path.display(), %err, "unparsable splash config, using defaults");
                SplashConfig::default()
            }),
            Err(_) => SplashConfig::default(),
        };

        // Accessibility signals always win over stored preferences.
        if env.var("PREFERS_REDUCED_MOTION").as_deref() == Some("1") {
            config.reduced_motion = true;
        }
        if env.var("NO_COLOR").is_some() {
            config.color_mode = "16".to_string();
        }

        config
    }

    /// Saves the config as pretty-printed JSON, creating parent directories.
    pub fn save(&self, config: &SplashConfig) -> Result<()> {
        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, data)?;
        Ok(())
    }

    /// Returns whether this is the first run (marker absent).
    pub fn is_first_run(&self) -> bool {
        !self.marker_path.exists()
    }

    /// Records that the splash has been shown. Idempotent; the marker is
    /// never deleted by this engine.
    pub fn mark_shown(&self) -> Result<()> {
        if let Some(dir) = self.marker_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.marker_path, "shown")?;
        Ok(())
    }

    /// One-way disable: loads, clears the enable flag, saves.
    pub fn disable_permanently(&self, env: &dyn EnvSource) -> Result<()> {
        let mut config = self.load(env);
        config.splash_enabled = false;
        self.save(&config)
    }
}

/// Decides whether the splash runs this time.
///
/// Disabled or reduced-motion always wins; the first run always shows;
/// otherwise the frequency policy dispatches, with `random` sampling ~10%.
pub fn should_show(config: &SplashConfig, first_run: bool, rng: &mut impl Rng) -> bool {
    if !config.splash_enabled || config.reduced_motion {
        return false;
    }

    if first_run {
        return true;
    }

    match config.splash_frequency {
        SplashFrequency::Always => true,
        SplashFrequency::Never => false,
        // Already shown once.
        SplashFrequency::First => false,
        SplashFrequency::Random => rng.random::<f64>() < RANDOM_SHOW_CHANCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedEnv;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_missing_config_yields_defaults() {
        let (_dir, store) = store();
        let config = store.load(&FixedEnv::new());
        assert_eq!(config, SplashConfig::default());
    }

    #[test]
    fn test_unparsable_config_yields_defaults() {
        let (dir, store) = store();
        fs::write(dir.path().join(CONFIG_FILE), "{not json").unwrap();
        assert_eq!(store.load(&FixedEnv::new()), SplashConfig::default());
    }

    #[test]
    fn test_round_trip_all_field_combinations() {
        let (_dir, store) = store();
        let frequencies = [
            SplashFrequency::Always,
            SplashFrequency::First,
            SplashFrequency::Random,
            SplashFrequency::Never,
        ];

        for enabled in [true, false] {
            for reduced in [true, false] {
                for frequency in frequencies {
                    for mode in ["truecolor", "256", "16", "auto"] {
                        let config = SplashConfig {
                            splash_enabled: enabled,
                            splash_frequency: frequency,
                            reduced_motion: reduced,
                            color_mode: mode.to_string(),
                        };
                        store.save(&config).unwrap();
                        assert_eq!(store.load(&FixedEnv::new()), config);
                    }
                }
            }
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&SplashConfig::default()).unwrap();
        for field in ["splash_enabled", "splash_frequency", "reduced_motion", "color_mode"] {
            assert!(json.contains(field), "missing field {field} in {json}");
        }
        assert!(json.contains("\"first\""));
    }

    #[test]
    fn test_reduced_motion_override_wins() {
        let (_dir, store) = store();
        store.save(&SplashConfig::default()).unwrap();

        let env = FixedEnv::new().with_var("PREFERS_REDUCED_MOTION", "1");
        assert!(store.load(&env).reduced_motion);
    }

    #[test]
    fn test_no_color_override_wins() {
        let (_dir, store) = store();
        let config = SplashConfig {
            color_mode: "truecolor".to_string(),
            ..Default::default()
        };
        store.save(&config).unwrap();

        let env = FixedEnv::new().with_var("NO_COLOR", "1");
        assert_eq!(store.load(&env).color_mode, "16");
    }

    #[test]
    fn test_first_run_marker_idempotent() {
        let (_dir, store) = store();
        assert!(store.is_first_run());

        store.mark_shown().unwrap();
        assert!(!store.is_first_run());

        store.mark_shown().unwrap();
        assert!(!store.is_first_run());
    }

    #[test]
    fn test_disable_permanently_persists() {
        let (_dir, store) = store();
        store.disable_permanently(&FixedEnv::new()).unwrap();

        let config = store.load(&FixedEnv::new());
        assert!(!config.splash_enabled);
    }

    #[test]
    fn test_from_env_honors_override() {
        let env = FixedEnv::new().with_var(CONFIG_DIR_ENV, "/tmp/splash-test");
        let store = ConfigStore::from_env(&env).unwrap();
        assert!(store.config_path.starts_with("/tmp/splash-test"));
    }

    #[test]
    fn test_frequency_policy_table() {
        let mut rng = StdRng::seed_from_u64(0);

        let disabled = SplashConfig { splash_enabled: false, ..Default::default() };
        assert!(!should_show(&disabled, true, &mut rng));
        assert!(!should_show(&disabled, false, &mut rng));

        let reduced = SplashConfig { reduced_motion: true, ..Default::default() };
        assert!(!should_show(&reduced, false, &mut rng));

        let always = SplashConfig {
            splash_frequency: SplashFrequency::Always,
            ..Default::default()
        };
        assert!(should_show(&always, false, &mut rng));

        let never = SplashConfig {
            splash_frequency: SplashFrequency::Never,
            ..Default::default()
        };
        assert!(!should_show(&never, false, &mut rng));
        // First run overrides even `never`.
        assert!(should_show(&never, true, &mut rng));

        let first = SplashConfig::default();
        assert!(should_show(&first, true, &mut rng));
        assert!(!should_show(&first, false, &mut rng));
    }

    #[test]
    fn test_random_frequency_samples_about_ten_percent() {
        let mut rng = StdRng::seed_from_u64(1234);
        let random = SplashConfig {
            splash_frequency: SplashFrequency::Random,
            ..Default::default()
        };

        let shown = (0..10_000)
            .filter(|_| should_show(&random, false, &mut rng))
            .count();
        assert!((700..1300).contains(&shown), "unexpected sample rate: {shown}/10000");
    }
}
