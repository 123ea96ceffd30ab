//! `.env` parsing. Values are only collected here; `load_and_apply` decides what to set.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().ok()?,
    };
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Value part of a line: quotes stripped, trailing ` # comment` dropped on bare values.
fn parse_value(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return inner.replace("\\\"", "\"");
    }
    if let Some(inner) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return inner.to_string();
    }
    match raw.find(" #") {
        Some(idx) => raw[..idx].trim_end().to_string(),
        None => raw.to_string(),
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), parse_value(value)))
}

/// `KEY=VALUE` lines; blank lines, `#` comments and lines without `=` are skipped.
/// No multiline values.
fn parse_dotenv(content: &str) -> HashMap<String, String> {
    content.lines().filter_map(parse_line).collect()
}

/// Loads `.env` from `override_dir` or the current directory. A missing file yields an empty map.
pub fn load_env_map(override_dir: Option<&Path>) -> std::io::Result<HashMap<String, String>> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(path)?;
    Ok(parse_dotenv(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_and_skips_noise() {
        let m = parse_dotenv("\n# comment\nFOO=bar\nNOT_KEY_VALUE\n=orphan\n  BAZ = quux  \n");
        assert_eq!(m.len(), 2);
        assert_eq!(m["FOO"], "bar");
        assert_eq!(m["BAZ"], "quux");
    }

    #[test]
    fn quoted_values() {
        let m = parse_dotenv("A=\"hello world\"\nB='single # kept'\nC=\"say \\\"hi\\\"\"\nD=\"\"\n");
        assert_eq!(m["A"], "hello world");
        assert_eq!(m["B"], "single # kept");
        assert_eq!(m["C"], "say \"hi\"");
        assert_eq!(m["D"], "");
    }

    #[test]
    fn export_prefix_and_inline_comment() {
        let m = parse_dotenv("export OPENEMR_USERNAME=admin # local only\nURL=http://x/#frag\n");
        assert_eq!(m["OPENEMR_USERNAME"], "admin");
        assert_eq!(m["URL"], "http://x/#frag");
    }

    #[test]
    fn empty_value_kept() {
        let m = parse_dotenv("KEY=\n");
        assert_eq!(m["KEY"], "");
    }

    #[test]
    fn load_env_map_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_map(Some(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn load_env_map_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "A=1\nB=2\n").unwrap();
        let m = load_env_map(Some(dir.path())).unwrap();
        assert_eq!(m["A"], "1");
        assert_eq!(m["B"], "2");
    }
}
