//! Project `.env` file as a key-value map. Nothing is applied to the environment here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// `.env` in `override_dir`, else in the current directory. `None` when there is no such file.
fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = match override_dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().ok()?,
    };
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Parses the `.env` file with the `dotenv` crate's line grammar. Missing file gives an empty map.
pub fn load_env_map(override_dir: Option<&Path>) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    let iter = ::dotenv::from_path_iter(&path).map_err(|e| LoadError::Dotenv {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let mut out = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| LoadError::Dotenv {
            path: path.clone(),
            message: e.to_string(),
        })?;
        out.insert(key, value);
    }
    Ok(out)
}
