use anyhow::{Context, Result};
use murmur_core::{CategoryOption, default_categories};
use std::fs;
use std::path::{Path, PathBuf};

/// `$MURMUR_HOME`, else `~/.murmur`.
pub fn murmur_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("MURMUR_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".murmur"))
}

pub fn ensure_murmur_home() -> Result<PathBuf> {
    let dir = murmur_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read a JSON array of `{ "id": ..., "name": ... }`.
pub fn read_categories(path: &Path) -> Result<Vec<CategoryOption>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cats: Vec<CategoryOption> =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(cats)
}

/// Explicit file > configured file > built-in defaults.
pub fn resolve_categories(
    explicit: Option<&Path>,
    configured: Option<&Path>,
) -> Result<Vec<CategoryOption>> {
    match explicit.or(configured) {
        Some(p) => read_categories(p),
        None => Ok(default_categories()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("murmur-state-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_read_categories_file() {
        let p = scratch("read").join("categories.json");
        fs::write(&p, r#"[{"id":"c1","name":"Dining"},{"id":"c2","name":"Taxi"}]"#).unwrap();
        let cats = read_categories(&p).unwrap();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0], CategoryOption::new("c1", "Dining"));
    }

    #[test]
    fn test_bad_categories_file_reports_path() {
        let p = scratch("bad").join("categories.json");
        fs::write(&p, "not json").unwrap();
        let err = read_categories(&p).unwrap_err();
        assert!(format!("{err:#}").contains("categories.json"));
    }

    #[test]
    fn test_defaults_when_nothing_given() {
        let cats = resolve_categories(None, None).unwrap();
        assert_eq!(cats, default_categories());
    }
}
