//! `[env]` table of `<config dir>/<app>/config.toml`.
//!
//! The config dir is `$XDG_CONFIG_HOME` when set, else the platform config dir from `dirs`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// Base config directory.
pub fn config_home() -> Result<PathBuf, LoadError> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => dirs::config_dir()
            .ok_or_else(|| LoadError::XdgPath("no config directory for this platform".into())),
    }
}

/// Path of the app's `config.toml` (may not exist).
pub fn config_path(app_name: &str) -> Result<PathBuf, LoadError> {
    Ok(config_home()?.join(app_name).join("config.toml"))
}

/// Reads `[env]` from `<base>/<app_name>/config.toml`. Missing file or section gives an empty map.
pub fn load_env_map_in(base: &Path, app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let path = base.join(app_name).join("config.toml");
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config.env)
}

pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    load_env_map_in(&config_home()?, app_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(app: &str, content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join(app);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), content).unwrap();
        dir
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_map_in(dir.path(), "parley").unwrap().is_empty());
    }

    #[test]
    fn reads_env_table() {
        let dir = write_config(
            "parley",
            "[env]\nAZURE_OPENAI_DEPLOYMENT_NAME = \"gpt-35\"\nPARLEY_HISTORY_DB = \"/tmp/h.db\"\n",
        );
        let m = load_env_map_in(dir.path(), "parley").unwrap();
        assert_eq!(m.get("AZURE_OPENAI_DEPLOYMENT_NAME").map(String::as_str), Some("gpt-35"));
        assert_eq!(m.get("PARLEY_HISTORY_DB").map(String::as_str), Some("/tmp/h.db"));
    }

    #[test]
    fn other_sections_are_ignored() {
        let dir = write_config("parley", "[other]\nkey = \"ignored\"\n");
        assert!(load_env_map_in(dir.path(), "parley").unwrap().is_empty());
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let dir = write_config("parley", "not valid toml [[[\n");
        let result = load_env_map_in(dir.path(), "parley");
        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }

    #[test]
    fn config_path_ends_with_app_file() {
        let path = config_path("parley").unwrap();
        assert!(path.ends_with("parley/config.toml"));
    }
}
