//! News headlines tool backed by NewsAPI (`/v2/everything`).

use crate::tools::registry::{ArgSpec, Tool, ToolArgs, ToolError};
use crate::tools::ApiCredential;
use async_trait::async_trait;
use serde::Deserialize;

const NEWS_ARGS: &[ArgSpec] = &[ArgSpec::string("topic")];
const PAGE_SIZE: &str = "3";

pub struct NewsTool {
    http: reqwest::Client,
    base_url: String,
    api_key: ApiCredential,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiError {
    #[serde(default)]
    message: Option<String>,
}

impl NewsTool {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: ApiCredential) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn headlines(&self, topic: &str) -> Result<String, ToolError> {
        let key = self.api_key.require()?;

        let response = self
            .http
            .get(format!("{}/v2/everything", self.base_url))
            .header("X-Api-Key", key)
            .query(&[
                ("q", topic),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("pageSize", PAGE_SIZE),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<NewsApiError>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            return Err(ToolError::Upstream(format!("NewsAPI returned {}: {}", status, detail)));
        }

        let body: EverythingResponse = response.json().await?;
        Ok(format_headlines(topic, &body.articles))
    }
}

fn format_headlines(topic: &str, articles: &[Article]) -> String {
    if articles.is_empty() {
        return format!("No recent news found for '{}'.", topic);
    }

    let mut summary = format!("Here are the top headlines for '{}':\n", topic);
    for article in articles {
        let title = article.title.as_deref().unwrap_or("Untitled");
        let description = article
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description available.");
        summary.push_str(&format!("- {}: {}\n", title, description));
    }
    summary
}

#[async_trait]
impl Tool for NewsTool {
    fn name(&self) -> &str {
        "get_news"
    }

    fn description(&self) -> &str {
        "Fetches recent news articles about a specific topic, person, or company."
    }

    fn arguments(&self) -> &[ArgSpec] {
        NEWS_ARGS
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        self.headlines(args.str("topic")?).await
    }
}
