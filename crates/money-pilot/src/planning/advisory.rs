//! Narrative advice layered on top of a plan.
//!
//! Generation is best effort: a generator never fails outward. When the remote
//! model is unreachable or answers with something unusable, the canned text for
//! the request is served instead and the advice is marked as a fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::calculator::format_rupees;
use super::domain::FinancialPlan;
use crate::config::AdvisoryConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisoryRequest {
    /// Three concrete next steps, returned as structured data.
    ActionPlan,
    /// Long-form HTML review of the whole plan.
    DeepAnalysis,
    /// Short HTML explainer of a topic, tailored to the plan.
    LearnMore { topic: String },
}

impl AdvisoryRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ActionPlan => "action_plan",
            Self::DeepAnalysis => "deep_analysis",
            Self::LearnMore { .. } => "learn_more",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    pub title: String,
    pub timeline: String,
    pub description: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", content = "body", rename_all = "snake_case")]
pub enum AdvisoryContent {
    ActionPlan(Vec<ActionStep>),
    Html(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorySource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub source: AdvisorySource,
    pub content: AdvisoryContent,
}

impl Advice {
    pub fn fallback(request: &AdvisoryRequest) -> Self {
        Self {
            source: AdvisorySource::Fallback,
            content: fallback_content(request),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory api key is not configured")]
    NotConfigured,
    #[error("advisory transport failed: {0}")]
    Transport(reqwest::Error),
    #[error("advisory api returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("advisory response missing generated text")]
    MissingText,
    #[error("advisory response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for AdvisoryError {
    /// The request URL never reaches error text or logs.
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

#[async_trait]
pub trait AdvisoryGenerator: Send + Sync {
    /// Always yields advice; failures degrade to the fallback for `request`.
    async fn advise(&self, plan: &FinancialPlan, request: &AdvisoryRequest) -> Advice;
}

/// Serves canned advice only. Used when no model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAdvisor;

#[async_trait]
impl AdvisoryGenerator for StaticAdvisor {
    async fn advise(&self, _plan: &FinancialPlan, request: &AdvisoryRequest) -> Advice {
        Advice::fallback(request)
    }
}

/// Gemini `generateContent` client.
pub struct GeminiAdvisor {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl GeminiAdvisor {
    pub fn from_config(config: &AdvisoryConfig) -> Result<Self, AdvisoryError> {
        let api_key = config.api_key.clone().ok_or(AdvisoryError::NotConfigured)?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            api_url: config.api_url.clone(),
        })
    }

    async fn generate(
        &self,
        plan: &FinancialPlan,
        request: &AdvisoryRequest,
    ) -> Result<AdvisoryContent, AdvisoryError> {
        let prompt = build_prompt(plan, request);
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        debug!(kind = request.kind(), "requesting generated advice");
        let response = self
            .client
            .post(&self.api_url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.text().await?;
        if !status.is_success() {
            return Err(AdvisoryError::Status {
                status: status.as_u16(),
                body: payload,
            });
        }

        let text = extract_text(&serde_json::from_str(&payload)?)?;
        parse_content(request, &text)
    }
}

#[async_trait]
impl AdvisoryGenerator for GeminiAdvisor {
    async fn advise(&self, plan: &FinancialPlan, request: &AdvisoryRequest) -> Advice {
        match self.generate(plan, request).await {
            Ok(content) => Advice {
                source: AdvisorySource::Generated,
                content,
            },
            Err(err) => {
                warn!(kind = request.kind(), error = %err, "advice generation failed; serving fallback");
                Advice::fallback(request)
            }
        }
    }
}

fn extract_text(payload: &Value) -> Result<String, AdvisoryError> {
    payload
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(AdvisoryError::MissingText)
}

fn parse_content(request: &AdvisoryRequest, text: &str) -> Result<AdvisoryContent, AdvisoryError> {
    match request {
        AdvisoryRequest::ActionPlan => {
            let steps: Vec<ActionStep> = serde_json::from_str(&strip_code_fences(text))?;
            Ok(AdvisoryContent::ActionPlan(steps))
        }
        AdvisoryRequest::DeepAnalysis | AdvisoryRequest::LearnMore { .. } => {
            Ok(AdvisoryContent::Html(text.to_string()))
        }
    }
}

/// Models like to wrap JSON in markdown fences; drop every fence marker.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

fn goal_lines(plan: &FinancialPlan) -> String {
    plan.goals
        .iter()
        .enumerate()
        .map(|(index, goal)| {
            format!(
                "{}. {}: ₹{} in {} years (priority: {})",
                index + 1,
                goal.goal_type.label(),
                format_rupees(goal.target_amount),
                goal.horizon_years,
                goal.priority.label(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn profile_block(plan: &FinancialPlan) -> String {
    let personal = &plan.personal;
    let surplus = personal.monthly_surplus();
    let savings_rate = surplus / personal.monthly_income * 100.0;
    format!(
        "- Age: {} years\n\
         - Monthly income: ₹{}\n\
         - Monthly expenses: ₹{}\n\
         - Monthly investable surplus: ₹{} ({savings_rate:.1}% savings rate)\n\
         - Current savings: ₹{}\n\
         - Risk tolerance: {}\n\
         - Investment experience: {}",
        personal.age,
        format_rupees(personal.monthly_income),
        format_rupees(personal.monthly_expenses),
        format_rupees(surplus),
        format_rupees(personal.current_savings),
        plan.preferences.risk.label(),
        plan.preferences.experience.label(),
    )
}

pub(crate) fn build_prompt(plan: &FinancialPlan, request: &AdvisoryRequest) -> String {
    let profile = profile_block(plan);
    let goals = goal_lines(plan);
    match request {
        AdvisoryRequest::ActionPlan => format!(
            "You are a financial advisor for an Indian retail investor. Produce a three-step plan.\n\n\
             Profile:\n{profile}\n\nGoals:\n{goals}\n\n\
             Respond with a JSON array only. Each element has the keys \"title\" (short), \
             \"timeline\" (for example \"Immediate\" or \"3-6 months\"), \"description\" \
             (one or two sentences) and \"resources\" (two or three platform names)."
        ),
        AdvisoryRequest::DeepAnalysis => {
            let emergency_target = plan.personal.monthly_expenses * 6.0;
            format!(
                "You are a certified financial planner with deep knowledge of Indian markets. \
                 Write a detailed review of this client's finances.\n\n\
                 Profile:\n{profile}\n\nGoals:\n{goals}\n\n\
                 Total goal amount: ₹{}\nEmergency fund requirement: ₹{}\n\n\
                 Cover financial health, goal feasibility with required SIPs at 12% equity returns, \
                 a portfolio split across equity (large/mid/small cap), debt (liquid/short/long \
                 duration) and gold (digital/sovereign bonds), concrete Indian products, risks and \
                 mitigations, tax optimisation under 80C and 80D, a 90-day action plan, and honest \
                 caveats. Format the answer as HTML using h3, h4, p, ul, li, strong and em tags.",
                format_rupees(plan.total_goal_amount()),
                format_rupees(emergency_target),
            )
        }
        AdvisoryRequest::LearnMore { topic } => format!(
            "You are a friendly financial advisor explaining \"{topic}\" to a client.\n\n\
             Profile:\n{profile}\n\nGoals:\n{goals}\n\n\
             Define the topic simply, explain why it matters for this client's age, income and \
             risk profile, use numbers from their situation, and end with two or three actionable \
             tips using Indian products and rupee amounts. Keep it to about 200-250 words of HTML \
             using p, strong, ul and li tags, addressing the client as \"you\"."
        ),
    }
}

pub fn fallback_content(request: &AdvisoryRequest) -> AdvisoryContent {
    match request {
        AdvisoryRequest::ActionPlan => AdvisoryContent::ActionPlan(vec![
            step(
                "Build Emergency Corpus",
                "Immediate",
                "Secure 6 months of expenses in a liquid fund or sweep-in FD.",
                &["Bank FD", "Liquid Funds"],
            ),
            step(
                "Start SIP Investment",
                "Next 1 Month",
                "Begin systematic investing in diversified equity mutual funds.",
                &["Zerodha Coin", "Groww", "Paytm Money"],
            ),
            step(
                "Review & Insure",
                "3-6 Months",
                "Ensure you have adequate Term and Health insurance coverage.",
                &["PolicyBazaar", "Ditto Insurance"],
            ),
        ]),
        AdvisoryRequest::DeepAnalysis => AdvisoryContent::Html(
            "<h3>Analysis Temporarily Unavailable</h3>\
             <p>We're unable to generate your deep analysis at this moment. This could be due to:</p>\
             <ul><li>Internet connectivity issues</li><li>API rate limits</li>\
             <li>Temporary service disruption</li></ul>\
             <p><strong>Please try again in a few moments.</strong> \
             Your data is safely stored and ready for analysis.</p>"
                .to_string(),
        ),
        AdvisoryRequest::LearnMore { topic } => AdvisoryContent::Html(format!(
            "<p><strong>{topic}</strong></p>\
             <p>We're unable to load the detailed explanation right now. \
             Please check your internet connection and try again.</p>"
        )),
    }
}

fn step(title: &str, timeline: &str, description: &str, resources: &[&str]) -> ActionStep {
    ActionStep {
        title: title.to_string(),
        timeline: timeline.to_string(),
        description: description.to_string(),
        resources: resources.iter().map(|name| name.to_string()).collect(),
    }
}
