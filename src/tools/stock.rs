//! Stock quote tool backed by Alpha Vantage (`GLOBAL_QUOTE`).

use crate::tools::registry::{ArgSpec, Tool, ToolArgs, ToolError};
use crate::tools::ApiCredential;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

const STOCK_ARGS: &[ArgSpec] = &[ArgSpec::string("ticker_symbol")];

pub struct StockTool {
    http: reqwest::Client,
    base_url: String,
    api_key: ApiCredential,
}

/// Alpha Vantage reports throttling and bad requests in-band with a 200.
#[derive(Debug, Default, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "Global Quote", default)]
    quote: HashMap<String, String>,
    #[serde(rename = "Note", default)]
    note: Option<String>,
    #[serde(rename = "Information", default)]
    information: Option<String>,
    #[serde(rename = "Error Message", default)]
    error_message: Option<String>,
}

impl StockTool {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: ApiCredential) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn quote(&self, ticker: &str) -> Result<String, ToolError> {
        let key = self.api_key.require()?;

        let response: QuoteResponse = self
            .http
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", ticker),
                ("apikey", key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::info!(ticker, quote = ?response.quote, "Alpha Vantage quote");
        interpret_quote(ticker, response)
    }
}

fn interpret_quote(ticker: &str, response: QuoteResponse) -> Result<String, ToolError> {
    let notice = response
        .note
        .or(response.information)
        .or(response.error_message);

    if response.quote.is_empty() {
        return Ok(match notice {
            Some(note) => format!("Stock API error for '{}': {}", ticker, note),
            None => format!(
                "No data returned from the stock API for '{}'. This could be due to an invalid ticker or API rate limits.",
                ticker
            ),
        });
    }

    let Some(price) = response.quote.get("05. price").filter(|p| !p.is_empty()) else {
        return Ok(match notice {
            Some(note) => format!("Stock API error for '{}': {}", ticker, note),
            None => format!(
                "Could not find the price in the API response for '{}'.",
                ticker
            ),
        });
    };

    let price: f64 = price
        .trim()
        .parse()
        .map_err(|_| ToolError::UnexpectedResponse(format!("price '{}' is not a number", price)))?;

    Ok(format!("The latest stock price for {} is ${:.2}.", ticker, price))
}

#[async_trait]
impl Tool for StockTool {
    fn name(&self) -> &str {
        "get_stock_price"
    }

    fn description(&self) -> &str {
        "Gets the latest stock price for a company using its stock ticker symbol (e.g., AAPL for Apple)."
    }

    fn arguments(&self) -> &[ArgSpec] {
        STOCK_ARGS
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        self.quote(args.str("ticker_symbol")?).await
    }
}
