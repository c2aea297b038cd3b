//! Typed runtime configuration loading.

use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::{RuntimeError, RuntimeResult},
    logging::DEFAULT_LOG_FILTER,
    preferences::PreferenceSnapshot,
};

pub const MAX_BACKGROUND_WORKERS: usize = 8;

/// Generic config loader selecting TOML or JSON by file extension.
///
/// `ConfigLoader<T>` handles only filesystem access and deserialization. Semantic validation
/// stays with the consuming type.
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Loads and deserializes the file. Anything but a `.json` extension is parsed as TOML.
    pub fn load(&self) -> RuntimeResult<T> {
        let body = fs::read_to_string(&self.path).map_err(|err| {
            RuntimeError::Config(format!("failed to read {}: {err}", self.path.display()))
        })?;
        let is_json = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&body)?)
        } else {
            Ok(toml::from_str(&body)?)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    /// Threads in the background pool used for I/O-bound effects.
    pub background_workers: usize,
    pub log_filter: String,
    /// `force` flag passed to the process restart primitive.
    pub force_restart: bool,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            background_workers: 2,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            force_restart: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub runtime: RuntimeSection,
    pub preferences: PreferenceSnapshot,
}

impl RuntimeConfig {
    pub fn load(path: impl Into<PathBuf>) -> RuntimeResult<Self> {
        let config: Self = ConfigLoader::new(path).load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RuntimeResult<()> {
        let workers = self.runtime.background_workers;
        if workers == 0 || workers > MAX_BACKGROUND_WORKERS {
            return Err(RuntimeError::Config(format!(
                "runtime.background_workers must be within 1..={MAX_BACKGROUND_WORKERS}, got {workers}"
            )));
        }
        let columns = self.preferences.home_grid_columns;
        if columns == 0 {
            return Err(RuntimeError::Config(
                "preferences.home_grid_columns must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::preferences::LauncherTheme;

    fn unique_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "launcher-config-{}-{nanos}-{name}",
            std::process::id()
        ))
    }

    #[test]
    fn loads_toml_with_partial_tables() {
        let path = unique_path("runtime.toml");
        fs::write(
            &path,
            "[runtime]\nbackground_workers = 3\n\n[preferences]\nlauncher_theme = \"dark\"\n",
        )
        .expect("write config");

        let config = RuntimeConfig::load(&path).expect("load config");
        assert_eq!(config.runtime.background_workers, 3);
        assert_eq!(config.runtime.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.preferences.launcher_theme, LauncherTheme::Dark);
        assert!(config.preferences.show_status_bar);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn loads_json_by_extension() {
        let path = unique_path("runtime.json");
        fs::write(&path, r#"{"runtime":{"force_restart":true}}"#).expect("write config");

        let config = RuntimeConfig::load(&path).expect("load config");
        assert!(config.runtime.force_restart);
        assert_eq!(config.preferences, PreferenceSnapshot::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_out_of_range_worker_count() {
        let config = RuntimeConfig {
            runtime: RuntimeSection {
                background_workers: 0,
                ..RuntimeSection::default()
            },
            ..RuntimeConfig::default()
        };
        let err = config.validate().expect_err("zero workers");
        assert!(err.to_string().contains("background_workers"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = RuntimeConfig::load(unique_path("absent.toml")).expect_err("missing file");
        assert!(matches!(err, RuntimeError::Config(_)));
    }
}
