use std::collections::HashMap;

use anyhow::{bail, Context};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::models::{NormalizedRow, StoredTransaction, TransactionRecord};
use crate::settings::AiConfig;

const CLASSIFY_SYSTEM: &str =
    "You are a financial analysis assistant. Analyze the transaction and categorize it accurately.";
const RECONCILE_SYSTEM: &str =
    "You are a financial reconciliation assistant. Help identify potential duplicates and inconsistencies in transactions.";
const INSIGHTS_SYSTEM: &str =
    "You are a financial insights assistant. Analyze spending patterns and provide actionable insights.";

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Category call for a single transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Classification {
    /// What every caller sees when the capability cannot answer.
    pub fn unavailable() -> Self {
        Self {
            category: "Other".to_string(),
            confidence: 0.5,
            explanation: Some("Failed to analyze transaction with AI".to_string()),
        }
    }
}

/// Batch-level flags. Indices refer to positions in the submitted batch;
/// explanation keys are stringified indices.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reconciliation {
    #[serde(default)]
    pub duplicates: Vec<Vec<usize>>,
    #[serde(default)]
    pub suspicious: Vec<usize>,
    #[serde(default)]
    pub explanations: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpendingAnalysis {
    pub top_categories: Vec<CategorySpend>,
    pub trends: Vec<MonthlyTrend>,
    pub patterns: Vec<SpendingPattern>,
    pub opportunities: Vec<SavingOpportunity>,
    pub recommendations: Vec<BudgetRecommendation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub change: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpendingPattern {
    pub description: String,
    #[serde(default)]
    pub severity: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingOpportunity {
    pub description: String,
    #[serde(default)]
    pub potential_savings: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecommendation {
    pub category: String,
    #[serde(default)]
    pub current_spending: f64,
    #[serde(default)]
    pub recommended_spending: f64,
    pub advice: String,
}

// ---------------------------------------------------------------------------
// Capability seams
// ---------------------------------------------------------------------------

/// Assigns a category to one normalized transaction. Never fails: an
/// unavailable backend degrades to `Classification::unavailable`.
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, row: &NormalizedRow) -> Classification;
}

/// Flags duplicates and oddities across one batch. Never fails: an
/// unavailable backend degrades to no flags.
#[async_trait::async_trait]
pub trait Reconciler: Send + Sync {
    async fn reconcile(&self, transactions: &[TransactionRecord]) -> Reconciliation;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible client
// ---------------------------------------------------------------------------

pub struct OpenAiClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl OpenAiClient {
    pub fn new(config: AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn chat_json(&self, system: &str, user: String) -> anyhow::Result<String> {
        #[derive(Serialize)]
        struct Msg {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct ResponseFormat {
            #[serde(rename = "type")]
            kind: String,
        }

        #[derive(Serialize)]
        struct Req {
            model: String,
            messages: Vec<Msg>,
            response_format: ResponseFormat,
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
            model: self.config.model.clone(),
            messages: vec![
                Msg {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Msg {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        tracing::debug!(model = %self.config.model, "requesting chat completion");
        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("openai error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse openai response")?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        Ok(content)
    }

    async fn try_classify(&self, row: &NormalizedRow) -> anyhow::Result<Classification> {
        let user = format!(
            "Please analyze this transaction:\n\
             Date: {}\n\
             Description: {}\n\
             Amount: {}\n\n\
             Provide the following in JSON format:\n\
             1. Category (Food, Transport, Shopping, Bills, Entertainment, Income, or Other)\n\
             2. Confidence score (0-1)\n\
             3. Brief explanation",
            row.date, row.description, row.amount
        );
        let content = self.chat_json(CLASSIFY_SYSTEM, user).await?;
        let mut parsed: Classification =
            serde_json::from_str(&content).context("parse analysis json")?;
        // Confidence stays in [0, 1] no matter what the model returns.
        parsed.confidence = parsed.confidence.clamp(0.0, 1.0);
        Ok(parsed)
    }

    async fn try_reconcile(&self, transactions: &[TransactionRecord]) -> anyhow::Result<Reconciliation> {
        let summaries: Vec<serde_json::Value> = transactions
            .iter()
            .map(|t| {
                serde_json::json!({
                    "date": t.date,
                    "description": t.description,
                    "amount": t.amount,
                    "category": t.category,
                    "reference": t.reference,
                    "balance": t.balance,
                    "confidence": t.confidence,
                })
            })
            .collect();
        let payload = serde_json::to_string_pretty(&summaries).context("encode transactions")?;
        let user = format!(
            "Please analyze these transactions for potential duplicates or inconsistencies:\n\
             {payload}\n\n\
             Provide the following in JSON format:\n\
             1. List of potential duplicate transaction pairs (indices)\n\
             2. List of suspicious transactions (indices)\n\
             3. Brief explanation for each flag"
        );
        let content = self.chat_json(RECONCILE_SYSTEM, user).await?;
        serde_json::from_str(&content).context("parse reconciliation json")
    }

    async fn try_analyze_spending(
        &self,
        transactions: &[StoredTransaction],
    ) -> anyhow::Result<SpendingAnalysis> {
        let summaries: Vec<serde_json::Value> = transactions
            .iter()
            .map(|t| {
                serde_json::json!({
                    "date": t.date,
                    "description": t.description,
                    "amount": t.amount,
                    "category": t.category,
                })
            })
            .collect();
        let payload = serde_json::to_string_pretty(&summaries).context("encode transactions")?;
        let user = format!(
            "Please analyze these transactions and provide financial insights:\n\
             {payload}\n\n\
             Provide the following in JSON format:\n\
             1. Top spending categories\n\
             2. Monthly trends\n\
             3. Unusual patterns\n\
             4. Saving opportunities\n\
             5. Budget recommendations"
        );
        let content = self.chat_json(INSIGHTS_SYSTEM, user).await?;
        serde_json::from_str(&content).context("parse insights json")
    }

    /// Spending insights over already-saved transactions, or the empty
    /// analysis when the backend cannot answer.
    pub async fn analyze_spending(&self, transactions: &[StoredTransaction]) -> SpendingAnalysis {
        match self.try_analyze_spending(transactions).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!("spending analysis failed: {e:#}");
                SpendingAnalysis::default()
            }
        }
    }
}

#[async_trait::async_trait]
impl Classifier for OpenAiClient {
    async fn classify(&self, row: &NormalizedRow) -> Classification {
        match self.try_classify(row).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("transaction analysis failed: {e:#}");
                Classification::unavailable()
            }
        }
    }
}

#[async_trait::async_trait]
impl Reconciler for OpenAiClient {
    async fn reconcile(&self, transactions: &[TransactionRecord]) -> Reconciliation {
        match self.try_reconcile(transactions).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("reconciliation failed: {e:#}");
                Reconciliation::default()
            }
        }
    }
}
