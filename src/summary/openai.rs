use async_trait::async_trait;
use serde_json::json;

use crate::{errors::AppError, summary::Summarizer};

const SYSTEM_PROMPT: &str =
    "You are an analyst who helps restaurant owners understand their customers' reviews.";

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }
}

fn build_prompt(place_name: &str, reviews_text: &str) -> String {
    format!(
        "Analyse the reviews of '{place_name}' for the selected period. \
         Each review includes its text, an NPS score (1 to 10), tags (for example 'Kitchen', 'Service') \
         and positive and negative vote counts. \
         Write a short summary in the following format:\n\
         - Average NPS score: [the average score]\n\
         - Positives: [what guests praise and which tags come up most]\n\
         - Negatives: [what guests complain about and which tags are involved]\n\
         - Recommendations: [one or two suggestions for improvement]\n\n\
         Here is the data:\n\n{reviews_text}\n\n\
         Keep the answer under 200 words."
    )
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, place_name: &str, reviews_text: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("Summarizer API key is not configured".into()))?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(place_name, reviews_text) },
            ],
            "max_tokens": 300,
            "temperature": 0.7,
        });

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach summarizer: {}", e)))?;

        if !res.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Summarizer responded with {}",
                res.status()
            )));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid summarizer response: {}", e)))?;

        json.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Upstream("Summarizer returned no content".into()))
    }
}
