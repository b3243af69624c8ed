//! Campus configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CampusError, CampusResult};
use crate::story::viewer::{DEFAULT_PROGRESS_STEP, FULL_PROGRESS};

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);
const DEFAULT_CLOCK_SYNC_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_CLOCK_TICK_INTERVAL: Duration = Duration::from_secs(1);
const ENV_PREFIX: &str = "CAMPUS";
static DEFAULT_LOG_LEVEL: &str = "warn";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_tick_interval() -> Duration {
    DEFAULT_TICK_INTERVAL
}

fn default_progress_step() -> u32 {
    DEFAULT_PROGRESS_STEP
}

fn default_clock_sync_interval() -> Duration {
    DEFAULT_CLOCK_SYNC_INTERVAL
}

fn default_clock_tick_interval() -> Duration {
    DEFAULT_CLOCK_TICK_INTERVAL
}

/// Global configuration at ~/.config/campus/config.toml
///
/// Every value can be overridden from the environment: `CAMPUS_` then the
/// key, with `__` between nested keys, e.g. `CAMPUS_LOG_LEVEL=debug` or
/// `CAMPUS_STORY__TICK_INTERVAL=20ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampusConfig {
    /// Content file with events and stories; the bundled content is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_path: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub story: StoryConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryConfig {
    #[serde(
        default = "default_tick_interval",
        deserialize_with = "parse_duration",
        serialize_with = "format_duration"
    )]
    pub tick_interval: Duration,

    /// Percent of a slide shown per tick
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(
        default = "default_clock_sync_interval",
        deserialize_with = "parse_duration",
        serialize_with = "format_duration"
    )]
    pub clock_sync_interval: Duration,

    /// How often the live clock redraws
    #[serde(
        default = "default_clock_tick_interval",
        deserialize_with = "parse_duration",
        serialize_with = "format_duration"
    )]
    pub clock_tick_interval: Duration,
}

impl Default for CampusConfig {
    fn default() -> Self {
        CampusConfig {
            content_path: None,
            log_level: default_log_level(),
            story: StoryConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl Default for StoryConfig {
    fn default() -> Self {
        StoryConfig {
            tick_interval: DEFAULT_TICK_INTERVAL,
            progress_step: DEFAULT_PROGRESS_STEP,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            clock_sync_interval: DEFAULT_CLOCK_SYNC_INTERVAL,
            clock_tick_interval: DEFAULT_CLOCK_TICK_INTERVAL,
        }
    }
}

fn parse_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

fn format_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*duration).to_string())
}

impl CampusConfig {
    pub fn config_path() -> CampusResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CampusError::Config("Could not determine config directory".into()))?
            .join("campus");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first run.
    pub fn load() -> CampusResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing) plus `CAMPUS_*` environment overrides.
    pub fn load_from(path: &Path) -> CampusResult<Self> {
        Self::load_layered(path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_layered(path: &Path, environment: Environment) -> CampusResult<Self> {
        let config: CampusConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(environment)
            .build()
            .map_err(|e| CampusError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CampusError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CampusResult<()> {
        if !(1..=FULL_PROGRESS).contains(&self.story.progress_step) {
            return Err(CampusError::Config(format!(
                "story.progress_step must be between 1 and {FULL_PROGRESS}, got {}",
                self.story.progress_step
            )));
        }
        if self.story.tick_interval.is_zero() {
            return Err(CampusError::Config("story.tick_interval must be positive".into()));
        }
        if self.calendar.clock_sync_interval.is_zero() {
            return Err(CampusError::Config(
                "calendar.clock_sync_interval must be positive".into(),
            ));
        }
        if self.calendar.clock_tick_interval.is_zero() {
            return Err(CampusError::Config(
                "calendar.clock_tick_interval must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The content file with `~` expanded.
    pub fn content_path(&self) -> Option<PathBuf> {
        self.content_path
            .as_ref()
            .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CampusResult<()> {
        let contents = format!(
            "\
# campus configuration

# Events and stories to show instead of the bundled content:
# content_path = \"~/campus/content.toml\"

# log_level = \"{DEFAULT_LOG_LEVEL}\"

[story]
# tick_interval = \"{}\"
# progress_step = {DEFAULT_PROGRESS_STEP}

[calendar]
# clock_sync_interval = \"{}\"
# clock_tick_interval = \"{}\"
",
            humantime::format_duration(DEFAULT_TICK_INTERVAL),
            humantime::format_duration(DEFAULT_CLOCK_SYNC_INTERVAL),
            humantime::format_duration(DEFAULT_CLOCK_TICK_INTERVAL),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CampusError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CampusError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CampusConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.story.tick_interval, Duration::from_millis(50));
        assert_eq!(config.story.progress_step, 1);
        assert_eq!(config.calendar.clock_sync_interval, Duration::from_secs(60));
        assert_eq!(config.log_level, "warn");
        assert!(config.content_path.is_none());
    }

    #[test]
    fn test_default_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        CampusConfig::create_default_config(&path).unwrap();
        let config = CampusConfig::load_from(&path).unwrap();
        assert_eq!(config.story.progress_step, DEFAULT_PROGRESS_STEP);
        assert_eq!(config.calendar.clock_sync_interval, DEFAULT_CLOCK_SYNC_INTERVAL);
    }

    #[test]
    fn test_reads_humantime_durations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
content_path = "~/school/content.toml"

[story]
tick_interval = "20ms"
progress_step = 5

[calendar]
clock_sync_interval = "5m"
"#,
        )
        .unwrap();

        let config = CampusConfig::load_from(&path).unwrap();
        assert_eq!(config.story.tick_interval, Duration::from_millis(20));
        assert_eq!(config.story.progress_step, 5);
        assert_eq!(config.calendar.clock_sync_interval, Duration::from_secs(300));
        let content = config.content_path().unwrap();
        assert!(content.ends_with("school/content.toml"));
        assert!(!content.starts_with("~"));
    }

    #[test]
    fn test_rejects_bad_progress_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[story]\nprogress_step = 0\n").unwrap();
        let err = CampusConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, CampusError::Config(_)));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = \"info\"\n[story]\ntick_interval = \"80ms\"\n").unwrap();

        let vars: config::Map<String, String> = [
            ("CAMPUS_LOG_LEVEL", "debug"),
            ("CAMPUS_STORY__TICK_INTERVAL", "20ms"),
            ("CAMPUS_STORY__PROGRESS_STEP", "4"),
            ("CAMPUS_CALENDAR__CLOCK_TICK_INTERVAL", "2s"),
            ("OTHER_LOG_LEVEL", "trace"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let environment = CampusConfig::environment().source(Some(vars));

        let config = CampusConfig::load_layered(&path, environment).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.story.tick_interval, Duration::from_millis(20));
        assert_eq!(config.story.progress_step, 4);
        assert_eq!(config.calendar.clock_tick_interval, Duration::from_secs(2));
        assert_eq!(config.calendar.clock_sync_interval, DEFAULT_CLOCK_SYNC_INTERVAL);
    }

    #[test]
    fn test_double_underscore_prefix_is_not_an_override() {
        let dir = tempfile::tempdir().unwrap();
        let vars: config::Map<String, String> =
            [("CAMPUS__STORY__TICK_INTERVAL".to_string(), "20ms".to_string())]
                .into_iter()
                .collect();
        let environment = CampusConfig::environment().source(Some(vars));

        let config = CampusConfig::load_layered(&dir.path().join("config.toml"), environment)
            .unwrap();
        assert_eq!(config.story.tick_interval, DEFAULT_TICK_INTERVAL);
    }

    #[test]
    fn test_rejects_unparseable_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[calendar]\nclock_sync_interval = \"soon\"\n").unwrap();
        assert!(CampusConfig::load_from(&path).is_err());
    }
}
