use anyhow::{Context, Result, bail};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::AuthState;
use crate::config::LlmSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

impl Provider {
    /// `catat auth` subcommand that stores this provider's key
    pub fn auth_command(&self) -> &'static str {
        match self {
            Provider::Anthropic => "catat auth paste-anthropic-token",
            Provider::OpenAI => "catat auth paste-openai-api-key",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            other => bail!("unknown llm provider: {other} (expected openai or anthropic)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Resolve the configured provider. `Ok(None)` when no key is available for it.
pub fn from_config(section: &LlmSection, auth: &AuthState) -> Result<Option<LlmConfig>> {
    let provider = Provider::from_name(&section.provider)?;
    let key = match provider {
        Provider::Anthropic => auth.anthropic_token.clone(),
        Provider::OpenAI => auth.openai_api_key.clone(),
    };
    let Some(key) = key else {
        return Ok(None);
    };
    let base_url = match provider {
        Provider::Anthropic if section.base_url.contains("api.openai.com") => {
            "https://api.anthropic.com".to_string()
        }
        _ => section.base_url.trim_end_matches('/').to_string(),
    };
    Ok(Some(LlmConfig {
        provider,
        model: section.model.clone(),
        base_url,
        temperature: section.temperature,
        timeout: Duration::from_secs(section.timeout_secs.max(1)),
        key,
    }))
}

pub async fn chat_complete(config: &LlmConfig, system: &str, turns: &[ChatTurn]) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .context("build http client")?;
    match config.provider {
        Provider::Anthropic => anthropic_complete(&client, config, system, turns).await,
        Provider::OpenAI => openai_complete(&client, config, system, turns).await,
    }
}

#[derive(Serialize)]
struct Msg {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct AnthropicReq {
    model: String,
    max_tokens: i32,
    temperature: f32,
    system: String,
    messages: Vec<Msg>,
}

#[derive(Deserialize)]
struct AnthropicResp {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    t: String,
    text: Option<String>,
}

#[derive(Serialize)]
struct OpenAiReq {
    model: String,
    messages: Vec<Msg>,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiResp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

fn anthropic_body(config: &LlmConfig, system: &str, turns: &[ChatTurn]) -> AnthropicReq {
    AnthropicReq {
        model: config.model.clone(),
        max_tokens: 32,
        temperature: config.temperature,
        system: system.to_string(),
        messages: turns
            .iter()
            .map(|t| Msg {
                role: t.role.clone(),
                content: t.content.clone(),
            })
            .collect(),
    }
}

fn openai_body(config: &LlmConfig, system: &str, turns: &[ChatTurn]) -> OpenAiReq {
    let mut messages = vec![Msg {
        role: "system".to_string(),
        content: system.to_string(),
    }];
    for t in turns {
        messages.push(Msg {
            role: t.role.clone(),
            content: t.content.clone(),
        });
    }
    OpenAiReq {
        model: config.model.clone(),
        messages,
        temperature: config.temperature,
    }
}

async fn anthropic_complete(
    client: &reqwest::Client,
    config: &LlmConfig,
    system: &str,
    turns: &[ChatTurn],
) -> Result<String> {
    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", HeaderValue::from_str(&config.key)?);
    headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let resp = client
        .post(format!("{}/v1/messages", config.base_url))
        .headers(headers)
        .json(&anthropic_body(config, system, turns))
        .send()
        .await
        .context("anthropic request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("anthropic error: {status} {txt}");
    }

    let out: AnthropicResp = resp.json().await.context("parse anthropic response")?;
    Ok(anthropic_text(out))
}

fn anthropic_text(out: AnthropicResp) -> String {
    let mut s = String::new();
    for b in out.content {
        if b.t == "text" {
            if let Some(t) = b.text {
                s.push_str(&t);
            }
        }
    }
    s.trim().to_string()
}

async fn openai_complete(
    client: &reqwest::Client,
    config: &LlmConfig,
    system: &str,
    turns: &[ChatTurn],
) -> Result<String> {
    let resp = client
        .post(format!("{}/v1/chat/completions", config.base_url))
        .header(AUTHORIZATION, format!("Bearer {}", config.key))
        .json(&openai_body(config, system, turns))
        .send()
        .await
        .context("openai request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("openai error: {status} {txt}");
    }

    let out: OpenAiResp = resp.json().await.context("parse openai response")?;
    let content = out
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default();

    Ok(content.trim().to_string())
}
