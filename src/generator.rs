//! AI proposal generator
//!
//! Sends the user's project description to an OpenAI-compatible
//! chat-completions endpoint and returns the generated proposal. Replies that
//! are not a JSON object fall back to a fixed proposal outline.

use crate::config::GeneratorConfig;
use crate::error::AppError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1000;

const SYSTEM_PROMPT: &str = r#"You are ISpaniBot, an expert freelance proposal generator specializing in creating professional, compelling proposals for various projects.

Your task is to generate a concise, structured proposal based on the user's project description. The proposal should be professional, clear, and demonstrate capabilities while keeping each section brief.

Return your response as a JSON object with the following structure:
{
  "title": "Professional project title",
  "executive_summary": "A brief 1-2 sentence executive summary highlighting the key value proposition",
  "problem_statement": "Clear, concise identification of the client's main needs and challenges",
  "objectives": ["3-4 specific", "measurable", "objectives"],
  "proposed_solution": "Brief methodology and approach to solving the problem",
  "implementation_plan": "Concise timeline with key milestones",
  "budget": {
    "total_cost": "Total project cost (e.g., '$5,000 - $8,000')",
    "breakdown": ["Planning: $1,000", "Development: $3,000", "Testing: $1,000"]
  },
  "team": "Brief description of team expertise and qualifications",
  "risks": ["Key risk with brief mitigation", "Another risk with brief mitigation"],
  "conclusion": "Strong, concise conclusion with clear next steps"
}

Keep each section brief but professional. Use clear, actionable language."#;

const FALLBACK_OVERVIEW: &str = "AI-generated proposal content";
const FALLBACK_DELIVERABLES: [&str; 4] = [
    "Custom solution development",
    "Quality assurance and testing",
    "Documentation and support",
    "Timely delivery and communication",
];
const FALLBACK_TIMELINE: &str = "2-4 weeks depending on project complexity";
const FALLBACK_PRICE: &str = "$2,500 - $4,000";

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Outline returned when the model reply is not usable JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackProposal {
    pub overview: String,
    pub deliverables: Vec<String>,
    pub timeline: String,
    pub price: String,
}

impl FallbackProposal {
    fn from_content(content: &str) -> Self {
        let overview = content
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .unwrap_or(FALLBACK_OVERVIEW);

        Self {
            overview: overview.to_string(),
            deliverables: FALLBACK_DELIVERABLES.iter().map(|d| d.to_string()).collect(),
            timeline: FALLBACK_TIMELINE.to_string(),
            price: FALLBACK_PRICE.to_string(),
        }
    }
}

/// Generated proposal: the model's JSON object, or the fallback outline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedProposal {
    Structured(serde_json::Map<String, serde_json::Value>),
    Fallback(FallbackProposal),
}

impl GeneratedProposal {
    /// Interpret the model reply. Markdown code fences are ignored.
    pub fn from_content(content: &str) -> Self {
        let body = strip_code_fence(content);
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(map)) => GeneratedProposal::Structured(map),
            Ok(_) => {
                warn!("Generator reply is JSON but not an object, using fallback");
                GeneratedProposal::Fallback(FallbackProposal::from_content(body))
            }
            Err(e) => {
                warn!("Failed to parse generator reply as JSON, using fallback: {}", e);
                GeneratedProposal::Fallback(FallbackProposal::from_content(body))
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GeneratedProposal::Fallback(_))
    }
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Client for the chat-completions API
#[derive(Debug, Clone)]
pub struct ProposalGenerator {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ProposalGenerator {
    /// Build a generator; `None` when no API key is configured
    pub fn from_config(config: &GeneratorConfig) -> Result<Option<Self>, AppError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("freelance-hub-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Some(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url),
            api_key,
            model: config.model.clone(),
        }))
    }

    /// Generate a proposal for the given project description
    pub async fn generate(&self, user_prompt: &str) -> Result<GeneratedProposal, AppError> {
        info!("Generating proposal with model {}", self.model);
        debug!("Generator prompt: {}", user_prompt);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!(
                    "Create a professional freelance proposal for this project: {}",
                    user_prompt
                )),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Upstream("Generator API timed out".to_string())
                } else {
                    AppError::Upstream(format!("Generator API request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Generator API error: {} {}", status, body);
            return Err(AppError::Upstream(format!(
                "Generator API error: {} - {}",
                status.as_u16(),
                body
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid generator response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Upstream("Generator returned no choices".to_string()))?;

        let proposal = GeneratedProposal::from_content(&content);
        info!("Proposal generated (fallback: {})", proposal.is_fallback());

        Ok(proposal)
    }
}
