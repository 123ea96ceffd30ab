//! Load configuration from `config.toml` and a project `.env`, then apply it to the
//! process environment with priority: **existing env > .env > config.toml**.
//!
//! `config.toml` lives at `$XDG_CONFIG_HOME/<app>/config.toml`, falling back to the
//! platform config directory. Only its `[env]` table is read:
//!
//! ```toml
//! [env]
//! OPENEMR_BASE_URL = "https://emr.example.org"
//! CAREGUARD_HTTP_TIMEOUT_SECS = 15
//! ```

mod dotenv;
mod xdg_toml;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use xdg_toml::config_file_path;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read config.toml: {0}")]
    XdgRead(std::io::Error),
    #[error("parse config.toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("config.toml [env].{0} must be a string, number or boolean")]
    XdgValue(String),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Loads `config.toml` and `.env`, then sets each variable that is **not** already set.
///
/// * `app_name`: e.g. `"careguard"`; selects `<config home>/<app_name>/config.toml`.
/// * `override_dir`: directory holding `.env`; defaults to the current directory.
///
/// Returns the keys that were set.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<Vec<String>, LoadError> {
    let xdg_map = match config_file_path(app_name) {
        Some(path) => xdg_toml::load_env_map(&path)?,
        None => HashMap::new(),
    };
    let dotenv_map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let mut applied = Vec::new();
    for (key, value) in merge(dotenv_map, xdg_map) {
        if std::env::var_os(&key).is_some() {
            continue;
        }
        std::env::set_var(&key, value);
        applied.push(key);
    }
    applied.sort();
    Ok(applied)
}

/// `.env` entries win over `config.toml` entries with the same key.
fn merge(
    dotenv: HashMap<String, String>,
    mut xdg: HashMap<String, String>,
) -> HashMap<String, String> {
    xdg.extend(dotenv);
    xdg
}

/// Directory that holds `config.toml` for `app_name`, whether or not it exists.
pub fn config_dir(app_name: &str) -> Option<PathBuf> {
    xdg_toml::config_home().map(|home| home.join(app_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn dotenv_overrides_xdg_in_merge() {
        let merged = merge(
            map(&[("SHARED", "from_dotenv"), ("DOTENV_ONLY", "d")]),
            map(&[("SHARED", "from_xdg"), ("XDG_ONLY", "x")]),
        );
        assert_eq!(merged.get("SHARED").map(String::as_str), Some("from_dotenv"));
        assert_eq!(merged.get("DOTENV_ONLY").map(String::as_str), Some("d"));
        assert_eq!(merged.get("XDG_ONLY").map(String::as_str), Some("x"));
    }

    #[test]
    fn existing_env_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "CAREGUARD_CFG_TEST_EXISTING=from_dotenv\n",
        )
        .unwrap();
        env::set_var("CAREGUARD_CFG_TEST_EXISTING", "from_env");
        let applied = load_and_apply("careguard-cfg-test-nonexistent", Some(dir.path())).unwrap();
        assert_eq!(
            env::var("CAREGUARD_CFG_TEST_EXISTING").as_deref(),
            Ok("from_env")
        );
        assert!(!applied.contains(&"CAREGUARD_CFG_TEST_EXISTING".to_string()));
        env::remove_var("CAREGUARD_CFG_TEST_EXISTING");
    }

    #[test]
    fn dotenv_applied_when_unset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "CAREGUARD_CFG_TEST_DOTENV=from_dotenv\n",
        )
        .unwrap();
        env::remove_var("CAREGUARD_CFG_TEST_DOTENV");
        let applied = load_and_apply("careguard-cfg-test-nonexistent", Some(dir.path())).unwrap();
        let val = env::var("CAREGUARD_CFG_TEST_DOTENV").unwrap();
        env::remove_var("CAREGUARD_CFG_TEST_DOTENV");
        assert_eq!(val, "from_dotenv");
        assert!(applied.contains(&"CAREGUARD_CFG_TEST_DOTENV".to_string()));
    }

    #[test]
    fn no_sources_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let applied = load_and_apply("careguard-cfg-test-nonexistent", Some(dir.path())).unwrap();
        assert!(applied.is_empty());
    }

    #[test]
    fn config_dir_ends_with_app_name() {
        if let Some(dir) = config_dir("careguard") {
            assert!(dir.ends_with("careguard"));
        }
    }
}
