//! Configuration types and loading for p4x.
//!
//! The main entry point is [`P4xConfig`], the merged view of defaults,
//! `.p4x/config.yaml` and `P4X_*` environment variables. It is loaded with
//! [`load_config`] and written with [`save_config`].

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be written.
    #[error("failed to write config file: {0}")]
    WriteError(#[from] std::io::Error),

    /// The configuration could not be serialized to YAML.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] serde_yaml::Error),

    /// A layer contained an invalid value.
    #[error("invalid configuration: {0}")]
    LoadError(#[from] figment::Error),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Prefix for environment variable overrides, e.g. `P4X_TIMEOUT_SECS`.
pub const ENV_PREFIX: &str = "P4X_";

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// Settings for dispatching `p4` and presenting its results.
///
/// All fields use `serde` defaults so that a partially-specified YAML file
/// will be deserialized correctly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct P4xConfig {
    /// The `p4` executable name or path.
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Server address passed as `-p`.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// User name passed as `-u`.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Client workspace name passed as `-c`.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Extra global flags placed after `-p`/`-u`/`-c` and before the
    /// operation name.
    #[serde(default)]
    pub extra_flags: Vec<String>,

    /// Seconds before a running command is killed. `0` waits forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long status messages stay visible, in milliseconds.
    #[serde(default = "default_status_duration_ms")]
    pub status_duration_ms: u64,

    /// External diff program and its leading arguments.
    #[serde(default = "default_diff_tool")]
    pub diff_tool: String,

    /// Where command output is logged. Defaults to a file in the temp dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_log: Option<PathBuf>,
}

impl Default for P4xConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            port: None,
            user: None,
            client: None,
            extra_flags: Vec::new(),
            timeout_secs: default_timeout_secs(),
            status_duration_ms: default_status_duration_ms(),
            diff_tool: default_diff_tool(),
            output_log: None,
        }
    }
}

fn default_executable() -> String {
    "p4".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_status_duration_ms() -> u64 {
    3000
}

fn default_diff_tool() -> String {
    "diff -u".to_string()
}

/// Environment values such as `P4X_PORT=1666` arrive as numbers; keep them
/// as strings.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Helper methods
// ---------------------------------------------------------------------------

impl P4xConfig {
    /// Global flags for every invocation: `-p`, `-u`, `-c` when set, then
    /// `extra_flags`.
    pub fn global_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        for (flag, value) in [("-p", &self.port), ("-u", &self.user), ("-c", &self.client)] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                flags.push(flag.to_string());
                flags.push(value.to_string());
            }
        }
        flags.extend(self.extra_flags.iter().cloned());
        flags
    }

    /// The command timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// How long status messages stay visible.
    pub fn status_duration(&self) -> Duration {
        Duration::from_millis(self.status_duration_ms)
    }

    /// The diff program split into program and arguments.
    pub fn diff_command(&self) -> Vec<String> {
        self.diff_tool.split_whitespace().map(str::to_string).collect()
    }

    /// The output log path in effect.
    pub fn output_log_path(&self) -> PathBuf {
        self.output_log
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("p4x-output.log"))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Path of the config file inside a workspace root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(".p4x").join("config.yaml")
}

/// The layered figment for `root`: defaults, then the workspace config file
/// (if any), then `P4X_*` environment variables.
pub fn figment(root: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(P4xConfig::default()));
    if let Some(root) = root {
        figment = figment.merge(Yaml::file(config_path(root)));
    }
    figment.merge(Env::prefixed(ENV_PREFIX))
}

/// Load configuration for the workspace at `root`.
///
/// A missing config file is not an error.
///
/// # Errors
///
/// Returns [`ConfigError::LoadError`] if any layer holds a value of the
/// wrong type or the YAML is malformed.
pub fn load_config(root: Option<&Path>) -> Result<P4xConfig> {
    Ok(figment(root).extract()?)
}

/// Save configuration to `<root>/.p4x/config.yaml`, creating the directory
/// if needed.
///
/// # Errors
///
/// Returns [`ConfigError::WriteError`] on I/O failure or
/// [`ConfigError::SerializeError`] if serialization fails.
pub fn save_config(root: &Path, config: &P4xConfig) -> Result<()> {
    let path = config_path(root);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let cfg = P4xConfig::default();
        assert_eq!(cfg.executable, "p4");
        assert!(cfg.global_flags().is_empty());
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.status_duration(), Duration::from_millis(3000));
        assert_eq!(cfg.diff_command(), vec!["diff", "-u"]);
    }

    #[test]
    fn test_global_flags_order() {
        let cfg = P4xConfig {
            port: Some("ssl:perforce:1666".into()),
            user: Some("alice".into()),
            client: Some("alice-ws".into()),
            extra_flags: vec!["-z".into(), "tag".into()],
            ..P4xConfig::default()
        };
        assert_eq!(
            cfg.global_flags(),
            vec!["-p", "ssl:perforce:1666", "-u", "alice", "-c", "alice-ws", "-z", "tag"]
        );
    }

    #[test]
    fn test_empty_flag_values_are_skipped() {
        let cfg = P4xConfig {
            user: Some(String::new()),
            ..P4xConfig::default()
        };
        assert!(cfg.global_flags().is_empty());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let cfg = P4xConfig {
            timeout_secs: 0,
            ..P4xConfig::default()
        };
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = "executable: /opt/perforce/bin/p4\nclient: build-ws\n";
        let cfg: P4xConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.executable, "/opt/perforce/bin/p4");
        assert_eq!(cfg.client.as_deref(), Some("build-ws"));
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.diff_tool, "diff -u");
    }

    #[test]
    fn test_load_without_root_uses_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = load_config(None).unwrap();
            assert_eq!(cfg.executable, "p4");
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_precedence() {
        Jail::expect_with(|jail| {
            std::fs::create_dir_all(jail.directory().join(".p4x")).unwrap();
            jail.create_file(
                ".p4x/config.yaml",
                "executable: /opt/p4\ntimeout_secs: 10\nuser: bob\n",
            )?;
            jail.set_env("P4X_TIMEOUT_SECS", "5");
            jail.set_env("P4X_PORT", "1666");

            let cfg = load_config(Some(jail.directory())).unwrap();
            assert_eq!(cfg.executable, "/opt/p4");
            assert_eq!(cfg.user.as_deref(), Some("bob"));
            assert_eq!(cfg.timeout_secs, 5);
            assert_eq!(cfg.port.as_deref(), Some("1666"));
            Ok(())
        });
    }

    #[test]
    fn test_bad_value_is_load_error() {
        Jail::expect_with(|jail| {
            jail.set_env("P4X_TIMEOUT_SECS", "soon");
            let err = load_config(Some(jail.directory())).unwrap_err();
            assert!(matches!(err, ConfigError::LoadError(_)));
            Ok(())
        });
    }

    #[test]
    fn test_roundtrip_config() {
        let dir = tempfile::tempdir().unwrap();

        let cfg = P4xConfig {
            client: Some("alice-ws".into()),
            timeout_secs: 12,
            ..P4xConfig::default()
        };
        save_config(dir.path(), &cfg).unwrap();

        let yaml = std::fs::read_to_string(config_path(dir.path())).unwrap();
        let loaded: P4xConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_save_omits_unset_fields() {
        let dir = tempfile::tempdir().unwrap();
        save_config(dir.path(), &P4xConfig::default()).unwrap();

        let yaml = std::fs::read_to_string(config_path(dir.path())).unwrap();
        assert!(yaml.contains("executable: p4"));
        assert!(!yaml.contains("client"));
        assert!(!yaml.contains("output_log"));
    }

    #[test]
    fn test_output_log_default_in_temp_dir() {
        let cfg = P4xConfig::default();
        assert_eq!(cfg.output_log_path(), std::env::temp_dir().join("p4x-output.log"));
    }
}
