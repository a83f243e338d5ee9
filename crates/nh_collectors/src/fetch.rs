use std::time::Duration;

use nh_core::Result;

/// Identifying user-agent attached to every outbound request.
pub const USER_AGENT: &str = concat!("newsharvest/", env!("CARGO_PKG_VERSION"));

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around a shared HTTP client with the collection defaults
/// (user-agent, bounded timeout) applied.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a page body. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_identifies_the_crate() {
        assert!(USER_AGENT.starts_with("newsharvest/"));
    }

    #[test]
    fn fetcher_builds() {
        assert!(PageFetcher::new().is_ok());
    }
}
