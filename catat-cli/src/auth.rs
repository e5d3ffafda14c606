use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};

use crate::state::ensure_catat_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthState {
    pub anthropic_token: Option<String>,
    pub openai_api_key: Option<String>,
}

fn auth_path() -> Result<std::path::PathBuf> {
    Ok(ensure_catat_home()?.join("auth.json"))
}

fn load_stored_auth() -> Result<AuthState> {
    let p = auth_path()?;
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Stored keys, with `CATAT_OPENAI_API_KEY` / `CATAT_ANTHROPIC_TOKEN` taking precedence
pub fn load_auth() -> Result<AuthState> {
    let mut auth = load_stored_auth()?;

    if let Some(key) = env_secret("CATAT_OPENAI_API_KEY") {
        auth.openai_api_key = Some(key);
    }
    if let Some(token) = env_secret("CATAT_ANTHROPIC_TOKEN") {
        auth.anthropic_token = Some(token);
    }
    Ok(auth)
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn save_auth(auth: &AuthState) -> Result<()> {
    let p = auth_path()?;
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

fn read_line_from_stdin(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Prompt for a secret, check its prefix and store it in auth.json
fn paste_secret(
    what: &str,
    prefix: &str,
    slot: impl FnOnce(&mut AuthState) -> &mut Option<String>,
) -> Result<()> {
    let secret = read_line_from_stdin(&format!("Paste {what} (starts with {prefix})"))?;
    if !secret.starts_with(prefix) {
        bail!("that does not look like an {what} (expected prefix {prefix})");
    }
    let mut auth = load_stored_auth()?;
    *slot(&mut auth) = Some(secret);
    save_auth(&auth)?;
    println!("Saved {what} to {}", auth_path()?.display());
    Ok(())
}

pub fn anthropic_paste_token() -> Result<()> {
    paste_secret("Anthropic token", "sk-ant-", |a| &mut a.anthropic_token)
}

pub fn openai_paste_api_key() -> Result<()> {
    paste_secret("OpenAI API key", "sk-", |a| &mut a.openai_api_key)
}
