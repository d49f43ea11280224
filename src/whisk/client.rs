//! Whisk Client
//!
//! Main client for the platform REST API, combining the configuration
//! snapshot with the HTTP wrapper.

use super::api::{ApiListOptions, ApiResource};
use super::http::WhiskHttpClient;
use crate::config::ClientConfig;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use url::Url;

/// Main platform client
#[derive(Clone)]
pub struct WhiskClient {
    pub config: ClientConfig,
    pub http: WhiskHttpClient,
    base_url: Url,
}

impl WhiskClient {
    /// Create a new client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.host.is_empty() {
            anyhow::bail!("No API host configured. Set WSK_APIHOST or use --apihost");
        }

        let base_url = Url::parse(&config.api_base_url())
            .with_context(|| format!("Invalid API host '{}'", config.host))?;
        let http = WhiskHttpClient::new(config.insecure)?;

        Ok(Self {
            config: config.clone(),
            http,
            base_url,
        })
    }

    pub fn apis(&self) -> ApisService<'_> {
        ApisService { client: self }
    }

    /// Build a URL for a namespaced collection, e.g. `namespaces/<ns>/apis`
    pub fn namespace_url(&self, collection: &str) -> Result<Url> {
        let path = format!(
            "namespaces/{}/{}",
            urlencoding::encode(&self.config.namespace),
            collection
        );
        self.base_url
            .join(&path)
            .with_context(|| format!("Failed to build URL for {}", path))
    }
}

/// Gateway API operations
pub struct ApisService<'a> {
    client: &'a WhiskClient,
}

impl ApisService<'_> {
    fn token(&self) -> &str {
        &self.client.config.auth_token
    }

    fn lookup_url(&self, api: &ApiResource) -> Result<Url> {
        let mut url = self.client.namespace_url("apis")?;
        url.query_pairs_mut()
            .append_pair("basepath", &api.gateway_base_path)
            .append_pair("relpath", &api.gateway_rel_path)
            .append_pair("operation", &api.gateway_method);
        Ok(url)
    }

    /// Create or (with `overwrite`) replace an API
    pub async fn insert(&self, api: &ApiResource, overwrite: bool) -> Result<ApiResource> {
        let mut url = self.client.namespace_url("apis")?;
        url.query_pairs_mut()
            .append_pair("overwrite", if overwrite { "true" } else { "false" });

        let body = json!({ "apidoc": api });
        let response = self.client.http.put(url.as_str(), self.token(), &body).await?;
        decode_api(response)
    }

    pub async fn get(&self, api: &ApiResource) -> Result<ApiResource> {
        let url = self.lookup_url(api)?;
        let response = self.client.http.get(url.as_str(), self.token()).await?;
        decode_api(response)
    }

    pub async fn delete(&self, api: &ApiResource) -> Result<()> {
        let url = self.lookup_url(api)?;
        self.client.http.delete(url.as_str(), self.token()).await?;
        Ok(())
    }

    pub async fn list(&self, options: &ApiListOptions) -> Result<Vec<ApiResource>> {
        let mut url = self.client.namespace_url("apis")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("skip", &options.skip.to_string())
                .append_pair("limit", &options.limit.to_string())
                .append_pair("docs", if options.docs { "true" } else { "false" });
            if let Some(action) = &options.action {
                query.append_pair("action", action);
            }
            if let Some(path) = &options.path {
                query.append_pair("relpath", path);
            }
            if let Some(verb) = &options.verb {
                query.append_pair("operation", verb);
            }
        }

        let response = self.client.http.get(url.as_str(), self.token()).await?;
        match response {
            Value::Null => Ok(Vec::new()),
            Value::Array(_) => {
                serde_json::from_value(response).context("Failed to parse API list")
            }
            other => {
                // Some gateways wrap the list: {"apis": [...]}
                let items = other
                    .get("apis")
                    .cloned()
                    .context("Unexpected API list response")?;
                serde_json::from_value(items).context("Failed to parse API list")
            }
        }
    }
}

/// Decode a stored API, accepting both a bare document and an `apidoc` wrapper
fn decode_api(response: Value) -> Result<ApiResource> {
    let doc = match response {
        Value::Object(mut obj) if obj.contains_key("apidoc") => {
            obj.remove("apidoc").unwrap_or(Value::Null)
        }
        Value::Null => return Ok(ApiResource::default()),
        other => other,
    };
    serde_json::from_value(doc).context("Failed to parse API response")
}
