use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::{Captures, Regex};
use tracing::debug;

use crate::engine::DEFAULT_ENGINE_NAME;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub engine_config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    12394
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Logical name the adapter resolves.
    #[serde(default = "default_engine_name")]
    pub engine_name: String,
    /// Python sidecar hosting the engine module. No sidecar, no engine.
    #[serde(default)]
    pub python_service_url: Option<String>,
    /// When set, `init` is sent once at startup with this path.
    #[serde(default)]
    pub models_path: Option<String>,
    /// How long `/api/health` waits on the sidecar before reporting it down.
    #[serde(default = "default_health_check_timeout_ms")]
    pub health_check_timeout_ms: u64,
}

fn default_engine_name() -> String {
    DEFAULT_ENGINE_NAME.to_string()
}

fn default_health_check_timeout_ms() -> u64 {
    2000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_name: default_engine_name(),
            python_service_url: None,
            models_path: None,
            health_check_timeout_ms: default_health_check_timeout_ms(),
        }
    }
}

impl Config {
    /// Files tried at startup, in order: `$CONFIG_PATH`, `conf.yaml`, `conf.json`.
    pub fn search_paths() -> Vec<String> {
        vec![
            std::env::var("CONFIG_PATH").ok(),
            Some("conf.yaml".to_string()),
            Some("conf.json".to_string()),
        ].into_iter().flatten().collect()
    }

    /// Load the first of `paths` that parses, along with the path it came from.
    pub fn discover(paths: &[String]) -> Option<(Self, String)> {
        for path in paths {
            match Self::load(path) {
                Ok(config) => return Some((config, path.clone())),
                Err(e) => debug!("Failed to load config from {}: {}", path, e),
            }
        }
        None
    }

    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let bytes = fs::read(path)?;
        let (content, _) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
        let content = substitute_env_vars(&content);

        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Apply environment overrides on top of the file.
    pub fn with_env_overrides(self) -> Self {
        self.with_python_service_url(std::env::var("PYTHON_SERVICE_URL").ok())
    }

    /// Override the sidecar URL unless `url` is missing or blank.
    fn with_python_service_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            self.engine_config.python_service_url = Some(url);
        }
        self
    }
}

/// Replace `${VAR_NAME}` with the variable's value. Unset variables are left as written.
fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static pattern");
    pattern
        .replace_all(content, |caps: &Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &[u8]) -> String {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine_config.engine_name, "argos_service");
        assert_eq!(config.engine_config.python_service_url, None);
        assert_eq!(config.system_config.port, 12394);
    }

    #[test]
    fn test_load_yaml_with_partial_sections() {
        let path = write_temp(
            "conf.yaml",
            b"engine_config:\n  python_service_url: http://localhost:8000\n",
        );

        let config = Config::load(&path).unwrap();

        assert_eq!(
            config.engine_config.python_service_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.engine_config.engine_name, "argos_service");
        assert_eq!(config.system_config.host, "0.0.0.0");
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_json_with_bom() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice(
            br#"{"system_config": {"port": 9000}, "engine_config": {"models_path": "/data/models"}}"#,
        );
        let path = write_temp("conf.json", &content);

        let config = Config::load(&path).unwrap();

        assert_eq!(config.system_config.port, 9000);
        assert_eq!(config.engine_config.models_path.as_deref(), Some("/data/models"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/argos-bridge.yaml").is_err());
    }

    #[test]
    fn test_python_service_url_override() {
        let base = Config {
            engine_config: EngineConfig {
                python_service_url: Some("http://from-file:8000".to_string()),
                ..EngineConfig::default()
            },
            ..Config::default()
        };

        std::env::set_var("PYTHON_SERVICE_URL", "http://sidecar:9000");
        let overridden = base.clone().with_env_overrides();
        std::env::set_var("PYTHON_SERVICE_URL", "   ");
        let blank = base.clone().with_env_overrides();
        std::env::remove_var("PYTHON_SERVICE_URL");
        let unset = base.with_env_overrides();

        assert_eq!(
            overridden.engine_config.python_service_url.as_deref(),
            Some("http://sidecar:9000")
        );
        assert_eq!(
            blank.engine_config.python_service_url.as_deref(),
            Some("http://from-file:8000")
        );
        assert_eq!(
            unset.engine_config.python_service_url.as_deref(),
            Some("http://from-file:8000")
        );
    }

    #[test]
    fn test_discover_takes_first_loadable_path() {
        let broken = write_temp("broken.json", b"{ not json");
        let yaml = write_temp("conf.yaml", b"system_config:\n  port: 9100\n");
        let json = write_temp("conf.json", br#"{"system_config": {"port": 9200}}"#);
        let paths = vec![
            "/nonexistent/conf.yaml".to_string(),
            broken.clone(),
            yaml.clone(),
            json.clone(),
        ];

        let (config, path) = Config::discover(&paths).unwrap();

        assert_eq!(path, yaml);
        assert_eq!(config.system_config.port, 9100);
        for file in [broken, yaml, json] {
            fs::remove_file(file).ok();
        }
    }

    #[test]
    fn test_discover_without_files_finds_nothing() {
        let paths = vec!["/nonexistent/conf.yaml".to_string()];
        assert!(Config::discover(&paths).is_none());
    }

    #[test]
    fn test_search_paths_end_with_local_files() {
        let paths = Config::search_paths();
        assert_eq!(
            &paths[paths.len() - 2..],
            &["conf.yaml".to_string(), "conf.json".to_string()]
        );
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("ARGOS_BRIDGE_TEST_MODELS", "/opt/models");

        let substituted = substitute_env_vars("models_path: ${ARGOS_BRIDGE_TEST_MODELS}");
        assert_eq!(substituted, "models_path: /opt/models");

        let untouched = substitute_env_vars("models_path: ${ARGOS_BRIDGE_TEST_UNSET_VAR}");
        assert_eq!(untouched, "models_path: ${ARGOS_BRIDGE_TEST_UNSET_VAR}");
    }
}
