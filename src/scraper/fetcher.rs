use crate::model::ScraperError;
use crate::scraper::traits::Fetcher;

use reqwest::Client;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.client.get(url)
            .send()
            .await
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScraperError::InvalidResponse(response.status().as_u16()));
        }

        response.text().await.map_err(|e| ScraperError::HttpError(e.to_string()))
    }
}
