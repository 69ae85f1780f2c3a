//! Process configuration for Parley binaries.
//!
//! [`load_and_apply`] reads the project `.env` and `<config dir>/<app>/config.toml` `[env]`
//! table and exports their keys to the process environment with priority
//! **existing env > .env > XDG**. Library code then reads plain env vars
//! (`AZURE_OPENAI_*`, `PARLEY_*`).
//!
//! With the `tracing-init` feature, [`init_tracing`] installs the shared subscriber.

mod dotenv;
mod xdg_toml;
#[cfg(feature = "tracing-init")]
mod tracing_init;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use xdg_toml::{config_home, config_path};
#[cfg(feature = "tracing-init")]
pub use tracing_init::{init_tracing, TracingGuard, TracingInitError, TracingOptions};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read {}: {message}", path.display())]
    Dotenv { path: PathBuf, message: String },
}

/// Picks the value to export for every key in either file, skipping keys for which
/// `is_set` is true. `.env` beats XDG. Result is sorted by key.
pub fn resolve<F>(
    dotenv_map: &HashMap<String, String>,
    xdg_map: &HashMap<String, String>,
    is_set: F,
) -> Vec<(String, String)>
where
    F: Fn(&str) -> bool,
{
    let mut out: Vec<(String, String)> = dotenv_map
        .iter()
        .chain(xdg_map.iter().filter(|(k, _)| !dotenv_map.contains_key(*k)))
        .filter(|(k, _)| !is_set(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    out.sort();
    out
}

/// Loads both sources and sets every resolved key that is not already in the environment.
///
/// * `app_name`: directory name under the config dir, e.g. `"parley"`.
/// * `override_dir`: look for `.env` here instead of the current directory.
///
/// Returns the keys that were set.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<Vec<String>, LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir)?;
    let resolved = resolve(&dotenv_map, &xdg_map, |k| std::env::var_os(k).is_some());
    let mut applied = Vec::with_capacity(resolved.len());
    for (key, value) in resolved {
        std::env::set_var(&key, value);
        applied.push(key);
    }
    Ok(applied)
}
