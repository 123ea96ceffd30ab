//! `[env]` table of `<config home>/<app>/config.toml`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// `$XDG_CONFIG_HOME` when set and absolute, else the platform config directory.
pub(crate) fn config_home() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(dirs::config_dir)
}

/// Path of `config.toml` for `app_name` when the file exists.
pub fn config_file_path(app_name: &str) -> Option<PathBuf> {
    let path = config_home()?.join(app_name).join("config.toml");
    path.is_file().then_some(path)
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, toml::Value>,
}

fn to_env_value(key: &str, value: toml::Value) -> Result<String, LoadError> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        _ => Err(LoadError::XdgValue(key.to_string())),
    }
}

pub(crate) fn parse_env_table(content: &str) -> Result<HashMap<String, String>, LoadError> {
    let config: ConfigFile = toml::from_str(content)?;
    config
        .env
        .into_iter()
        .map(|(k, v)| to_env_value(&k, v).map(|v| (k, v)))
        .collect()
}

/// Reads the `[env]` table of `path`. A missing section yields an empty map.
pub(crate) fn load_env_map(path: &Path) -> Result<HashMap<String, String>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(LoadError::XdgRead)?;
    parse_env_table(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_become_strings() {
        let map = parse_env_table(
            r#"
[env]
OPENEMR_BASE_URL = "https://emr.local"
CAREGUARD_HTTP_TIMEOUT_SECS = 15
OPENEMR_ACCEPT_INVALID_CERTS = true
"#,
        )
        .unwrap();
        assert_eq!(map["OPENEMR_BASE_URL"], "https://emr.local");
        assert_eq!(map["CAREGUARD_HTTP_TIMEOUT_SECS"], "15");
        assert_eq!(map["OPENEMR_ACCEPT_INVALID_CERTS"], "true");
    }

    #[test]
    fn missing_or_empty_section_is_empty() {
        assert!(parse_env_table("[env]\n").unwrap().is_empty());
        assert!(parse_env_table("[other]\nkey = \"ignored\"\n").unwrap().is_empty());
    }

    #[test]
    fn tables_and_arrays_are_rejected() {
        let err = parse_env_table("[env]\nLIST = [1, 2]\n").unwrap_err();
        assert!(matches!(err, LoadError::XdgValue(ref k) if k == "LIST"), "{err}");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(
            parse_env_table("not valid toml [[[\n"),
            Err(LoadError::XdgParse(_))
        ));
    }

    #[test]
    fn load_env_map_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[env]\nANTHROPIC_MODEL = \"claude-test\"\n").unwrap();
        let map = load_env_map(&path).unwrap();
        assert_eq!(map["ANTHROPIC_MODEL"], "claude-test");
    }

    #[test]
    fn unreadable_path_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_env_map(&dir.path().join("absent.toml")),
            Err(LoadError::XdgRead(_))
        ));
    }
}
