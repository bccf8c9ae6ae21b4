//! Wikipedia summary tool backed by the REST `page/summary` endpoint.

use crate::tools::registry::{ArgSpec, Tool, ToolArgs, ToolError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

const WIKIPEDIA_ARGS: &[ArgSpec] = &[ArgSpec::string("search_term")];

pub struct WikipediaTool {
    http: reqwest::Client,
    base_url: String,
    sentences: usize,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    extract: String,
}

impl WikipediaTool {
    pub fn new(http: reqwest::Client, base_url: &str, sentences: usize) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            sentences: sentences.max(1),
        }
    }

    fn summary_url(&self, search_term: &str) -> Result<reqwest::Url, ToolError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ToolError::Upstream(format!("invalid Wikipedia base URL: {}", e)))?;
        let title = search_term.trim().replace(' ', "_");
        url.path_segments_mut()
            .map_err(|_| ToolError::Upstream("Wikipedia base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(["page", "summary", title.as_str()]);
        Ok(url)
    }

    async fn summary(&self, search_term: &str) -> Result<String, ToolError> {
        let response = self.http.get(self.summary_url(search_term)?).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(format!(
                "Sorry, I couldn't find a Wikipedia page for '{}'.",
                search_term
            ));
        }

        let page: PageSummary = response.error_for_status()?.json().await?;

        if page.kind.as_deref() == Some("disambiguation") {
            return Ok(format!(
                "'{}' is ambiguous. Please be more specific.",
                search_term
            ));
        }
        if page.extract.trim().is_empty() {
            return Ok(format!(
                "Sorry, I couldn't find a Wikipedia page for '{}'.",
                search_term
            ));
        }

        Ok(first_sentences(&page.extract, self.sentences))
    }
}

/// Keep the first `n` sentences of `text`. A sentence ends at `.`, `!` or
/// `?` followed by whitespace or the end of the text.
fn first_sentences(text: &str, n: usize) -> String {
    let text = text.trim();
    let mut count = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                count += 1;
                if count == n {
                    return text[..idx + c.len_utf8()].to_string();
                }
            }
        }
    }
    text.to_string()
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "get_wikipedia_summary"
    }

    fn description(&self) -> &str {
        "Retrieves a concise summary of a topic from Wikipedia."
    }

    fn arguments(&self) -> &[ArgSpec] {
        WIKIPEDIA_ARGS
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        self.summary(args.str("search_term")?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sentences() {
        let text = "Python is a language. It was created by Guido. It is popular.";
        assert_eq!(
            first_sentences(text, 2),
            "Python is a language. It was created by Guido."
        );
        assert_eq!(first_sentences(text, 5), text);
    }

    #[test]
    fn test_first_sentences_ignores_inner_dots() {
        let text = "Version 3.12 was released. Next one soon.";
        assert_eq!(first_sentences(text, 1), "Version 3.12 was released.");
    }

    #[test]
    fn test_summary_url_encodes_title() {
        let tool = WikipediaTool::new(
            reqwest::Client::new(),
            "https://en.wikipedia.org/api/rest_v1",
            2,
        );
        let url = tool.summary_url("Rust (programming language)").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Rust_(programming_language)"
        );
    }

    #[test]
    fn test_summary_url_escapes_slash() {
        let tool = WikipediaTool::new(reqwest::Client::new(), "https://example.org/api/", 2);
        let url = tool.summary_url("AC/DC").unwrap();
        assert_eq!(url.as_str(), "https://example.org/api/page/summary/AC%2FDC");
    }
}
