//! HTTP advice gateway backed by a chat-completion model.
//!
//! The model is asked to reply with a JSON object matching [`AdviceResponse`].
//! Replies wrapped in a ```json fence are accepted; anything else that does not
//! parse is reported as a malformed response.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

use crate::error::GatewayError;
use crate::gateway::AdviceGateway;
use crate::request::{AdviceRequest, AdviceResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,
    /// Scheme and host, without the `/v1/...` path.
    pub base_url: String,
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

const SYSTEM_PROMPT: &str = "You are a personal finance advisor. Analyze the user's spending habits \
and suggest personalized budget optimizations and savings opportunities based on their financial goals. \
Reply with only a JSON object of the form {\"analysis\": string, \"suggestions\": [string, ...]}.";

/// User message listing goals, period, income and each expense.
pub fn render_prompt(request: &AdviceRequest) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "User's Financial Goals: {}", request.goals);
    let _ = writeln!(s, "Time Period: {}", request.time_period);
    let _ = writeln!(s, "Total Income: {}", request.income);
    s.push_str("Expenses:\n");
    for e in &request.expenses {
        let _ = writeln!(s, "- Category: {}, Amount: {}", e.category, e.amount);
    }
    s.push_str(
        "\nBased on this information, provide an analysis of the user's spending habits \
and a list of personalized budget optimization and savings suggestions.",
    );
    s
}

/// Pull an [`AdviceResponse`] out of free model text.
pub fn parse_advice_text(text: &str) -> Result<AdviceResponse, GatewayError> {
    let trimmed = text.trim();
    let body = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => {
            return Err(GatewayError::MalformedResponse(
                "no JSON object in model output".to_string(),
            ));
        }
    };

    let advice: AdviceResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    if advice.analysis.trim().is_empty() {
        return Err(GatewayError::MalformedResponse("empty analysis".to_string()));
    }
    Ok(advice)
}

#[derive(Debug, Clone)]
pub struct LlmAdviceGateway {
    config: LlmConfig,
    client: reqwest::Client,
}

impl LlmAdviceGateway {
    pub fn new(config: LlmConfig) -> Result<Self, GatewayError> {
        if config.api_key.trim().is_empty() {
            return Err(GatewayError::NotConfigured("missing API key".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::NotConfigured(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn anthropic_complete(&self, prompt: String) -> Result<String, GatewayError> {
        #[derive(Serialize)]
        struct Msg {
            role: &'static str,
            content: String,
        }

        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            max_tokens: u32,
            temperature: f32,
            system: &'static str,
            messages: Vec<Msg>,
        }

        #[derive(Deserialize)]
        struct Resp {
            content: Vec<ContentBlock>,
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            #[serde(rename = "type")]
            t: String,
            text: Option<String>,
        }

        let body = Req {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: SYSTEM_PROMPT,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
        };

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|e| GatewayError::NotConfigured(format!("API key: {e}")))?;
        headers.insert("x-api-key", key);
        headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let resp = self
            .client
            .post(self.endpoint("/v1/messages"))
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Service {
                status: status.as_u16(),
                body: txt,
            });
        }

        let out: Resp = resp.json().await?;
        let mut s = String::new();
        for b in out.content {
            if b.t == "text" {
                if let Some(t) = b.text {
                    s.push_str(&t);
                }
            }
        }
        Ok(s)
    }

    async fn openai_complete(&self, prompt: String) -> Result<String, GatewayError> {
        #[derive(Serialize)]
        struct Msg {
            role: &'static str,
            content: String,
        }

        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct Resp {
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

        let body = Req {
            model: &self.config.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let resp = self
            .client
            .post(self.endpoint("/v1/chat/completions"))
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Service {
                status: status.as_u16(),
                body: txt,
            });
        }

        let out: Resp = resp.json().await?;
        Ok(out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

impl AdviceGateway for LlmAdviceGateway {
    async fn get_advice(&self, request: &AdviceRequest) -> Result<AdviceResponse, GatewayError> {
        let prompt = render_prompt(request);
        tracing::debug!(
            provider = ?self.config.provider,
            model = %self.config.model,
            expenses = request.expenses.len(),
            "requesting advice"
        );

        let text = match self.config.provider {
            Provider::Anthropic => self.anthropic_complete(prompt).await?,
            Provider::OpenAI => self.openai_complete(prompt).await?,
        };
        parse_advice_text(&text)
    }
}
