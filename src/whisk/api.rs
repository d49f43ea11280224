//! Gateway API resource types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend method used by the gateway to invoke a bound action
pub const BACKEND_METHOD: &str = "POST";

/// HTTP verbs accepted for a gateway API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiVerb {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl ApiVerb {
    /// All verbs, sorted by name
    pub const ALL: [ApiVerb; 7] = [
        ApiVerb::Delete,
        ApiVerb::Get,
        ApiVerb::Head,
        ApiVerb::Options,
        ApiVerb::Patch,
        ApiVerb::Post,
        ApiVerb::Put,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApiVerb::Delete => "DELETE",
            ApiVerb::Get => "GET",
            ApiVerb::Head => "HEAD",
            ApiVerb::Options => "OPTIONS",
            ApiVerb::Patch => "PATCH",
            ApiVerb::Post => "POST",
            ApiVerb::Put => "PUT",
        }
    }
}

impl fmt::Display for ApiVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVerb {
    type Err = ();

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// The action invoked when an API is called
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionBinding {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backend_method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backend_url: String,
    #[serde(rename = "authkey", skip_serializing_if = "String::is_empty")]
    pub auth_token: String,
}

impl ActionBinding {
    /// Web invocation URL for an action on the platform at `host`
    pub fn backend_url_for(host: &str, namespace: &str, name: &str) -> String {
        format!(
            "https://{}/api/v1/namespaces/{}/actions/{}?blocking=true",
            host, namespace, name
        )
    }
}

/// A gateway path + verb mapping bound to a backend action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiResource {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(rename = "apiName", skip_serializing_if = "String::is_empty")]
    pub api_collection_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gateway_base_path: String,
    #[serde(rename = "gatewayPath", skip_serializing_if = "String::is_empty")]
    pub gateway_rel_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gateway_method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Assigned by the gateway
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gateway_full_path: String,
    #[serde(rename = "action")]
    pub bound_action: ActionBinding,
}

impl ApiResource {
    /// Identity used by this client: `namespace:basepath`
    pub fn derive_id(namespace: &str, base_path: &str) -> String {
        format!("{}:{}", namespace, base_path)
    }

    /// Same value with the auth key masked, for logging
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.bound_action.auth_token.is_empty() {
            copy.bound_action.auth_token = "***".to_string();
        }
        copy
    }
}

/// Filters for listing APIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiListOptions {
    pub action: Option<String>,
    pub path: Option<String>,
    pub verb: Option<String>,
    pub skip: u32,
    pub limit: u32,
    pub docs: bool,
}

impl Default for ApiListOptions {
    fn default() -> Self {
        Self {
            action: None,
            path: None,
            verb: None,
            skip: 0,
            limit: 30,
            docs: false,
        }
    }
}
