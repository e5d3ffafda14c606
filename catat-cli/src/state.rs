use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;

/// `$CATAT_HOME`, or `~/.catat`
pub fn catat_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CATAT_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".catat"))
}

pub fn ensure_catat_home() -> Result<PathBuf> {
    let dir = catat_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Per-user data directory, created on demand
pub fn user_dir(user_id: &str) -> Result<PathBuf> {
    let id = user_id.trim();
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        || id.starts_with('.')
    {
        bail!("invalid user id {user_id:?} (use letters, digits, '-', '_' or '.')");
    }
    let dir = ensure_catat_home()?.join("users").join(id);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
