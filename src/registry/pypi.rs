use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};

use super::{PackageRegistry, RegistryProject};
use crate::config::ResolverConfig;

/// Client for the PyPI JSON API (`GET {base}/pypi/{name}/json`).
pub struct PypiClient {
    client: Client,
    base_url: String,
}

impl PypiClient {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("pylicense-checkr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.registry_url.trim_end_matches('/').to_string(),
        })
    }

    fn project_url(&self, name: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, name)
    }
}

fn status_message(name: &str, status: StatusCode) -> String {
    if status == StatusCode::NOT_FOUND {
        format!("PyPI has no project named {}", name)
    } else {
        format!("PyPI returned {} for {}", status, name)
    }
}

impl PackageRegistry for PypiClient {
    async fn project(&self, name: &str) -> Result<RegistryProject> {
        let url = self.project_url(name);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("PyPI request for {} failed", name))?;

        let status = response.status();
        if !status.is_success() {
            bail!(status_message(name, status));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse PyPI response for {}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_url() {
        let config = ResolverConfig {
            registry_url: "https://mirror.example.org/".to_string(),
            ..ResolverConfig::default()
        };
        let client = PypiClient::new(&config).unwrap();
        assert_eq!(
            client.project_url("requests"),
            "https://mirror.example.org/pypi/requests/json"
        );
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            status_message("ghost", StatusCode::NOT_FOUND),
            "PyPI has no project named ghost"
        );
        assert_eq!(
            status_message("requests", StatusCode::TOO_MANY_REQUESTS),
            "PyPI returned 429 Too Many Requests for requests"
        );
        assert_eq!(
            status_message("requests", StatusCode::BAD_GATEWAY),
            "PyPI returned 502 Bad Gateway for requests"
        );
    }
}
