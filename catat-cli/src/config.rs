use anyhow::{Context, Result, anyhow};
use catat_core::{KnownCategory, Language};
use catat_finance::{CategoryRule, RuleSet, SuggestionMode};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_catat_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub user: UserSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub suggestion: SuggestionSection,
    /// Replaces the built-in keyword table when non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSection {
    pub id: String,
    /// Two-letter code: "id" or "en"
    pub language: String,
    /// IANA zone used to pick the entry date
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// "openai" (any OpenAI-compatible endpoint) or "anthropic"
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SuggestionSection {
    pub mode: SuggestionMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Category key: food, transport, shopping, bills, entertainment, health, income, other
    pub category: String,
    pub keywords: Vec<String>,
}

impl Default for UserSection {
    fn default() -> Self {
        Self {
            id: "local".to_string(),
            language: "id".to_string(),
            timezone: "Asia/Jakarta".to_string(),
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.2,
            timeout_secs: 20,
        }
    }
}

impl Config {
    pub fn language(&self) -> Result<Language> {
        Ok(self.user.language.parse::<Language>()?)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.user
            .timezone
            .parse()
            .map_err(|_| anyhow!("invalid timezone: {}", self.user.timezone))
    }

    /// Today's date in the configured zone
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(Utc::now().with_timezone(&self.timezone()?).date_naive())
    }

    pub fn rule_set(&self) -> Result<RuleSet> {
        if self.rules.is_empty() {
            return Ok(RuleSet::default());
        }
        let rules = self
            .rules
            .iter()
            .map(|r| -> Result<CategoryRule> {
                let category = KnownCategory::from_key(&r.category)
                    .ok_or_else(|| anyhow!("unknown category in [[rules]]: {}", r.category))?;
                Ok(CategoryRule {
                    category,
                    keywords: r.keywords.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleSet::new(rules))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_catat_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
