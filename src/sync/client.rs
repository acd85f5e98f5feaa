//! HTTP access to the translation service.

use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::config::{Credentials, ResourceId};
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("poctl/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ResourceDetails {
    #[serde(default)]
    available_languages: Vec<Language>,
}

#[derive(Debug, Deserialize)]
struct Language {
    code: String,
}

#[derive(Debug, Deserialize)]
struct TranslationPayload {
    content: String,
}

/// Client bound to one remote resource and one set of credentials.
pub struct RemoteSyncClient {
    http: reqwest::Client,
    resource_url: String,
    credentials: Credentials,
}

impl RemoteSyncClient {
    pub fn new(endpoint: &str, resource: &ResourceId, credentials: Credentials) -> Result<Self> {
        let resource_url = format!(
            "{}/project/{}/resource/{}/",
            endpoint.trim_end_matches('/'),
            resource.project,
            resource.resource
        );
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Network {
                url: resource_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            resource_url,
            credentials,
        })
    }

    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    /// Locale codes the resource has catalogs for, in the order listed.
    ///
    /// Codes that cannot name a file are skipped.
    pub async fn list_locales(&self) -> Result<Vec<String>> {
        let url = format!("{}?details", self.resource_url);
        let details: ResourceDetails = self.get_json(&url).await?;

        let mut locales = Vec::new();
        for language in details.available_languages {
            if !is_locale_code(&language.code) {
                warn!(code = %language.code, "skipping invalid locale code");
                continue;
            }
            if !locales.contains(&language.code) {
                locales.push(language.code);
            }
        }
        Ok(locales)
    }

    /// Catalog text of one locale.
    pub async fn fetch_locale(&self, locale: &str) -> Result<String> {
        let url = format!("{}translation/{}/", self.resource_url, locale);
        let payload: TranslationPayload = self.get_json(&url).await?;
        Ok(payload.content)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let network = |message: String| Error::Network {
            url: url.to_string(),
            message,
        };

        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .basic_auth(&self.credentials.user, Some(&self.credentials.secret))
            .send()
            .await
            .map_err(|e| network(e.to_string()))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(Error::Auth {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(network(format!("HTTP {}", status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| network(format!("invalid response body: {}", e)))
    }
}

/// Locale identifiers such as `fr`, `pt_BR`, `sr@latin` or `zh-Hant`.
fn is_locale_code(code: &str) -> bool {
    !code.is_empty()
        && !code.starts_with('.')
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '@' | '.'))
}
