//! `wsk api` command handlers
//!
//! Each handler checks its argument count, builds the [`ApiResource`] with
//! [`parse_api`] and only then talks to the gateway. Nothing reaches the
//! network when validation fails.

use crate::config::ClientConfig;
use crate::error::WskError;
use crate::render;
use crate::whisk::api::{ActionBinding, ApiListOptions, ApiResource, ApiVerb, BACKEND_METHOD};
use crate::whisk::client::WhiskClient;
use crate::whisk::qualified_name::QualifiedName;
use std::io::Write;

/// Base path and collection name used when no flag is given
pub const DEFAULT_API_ROOT: &str = "/";

/// Optional overrides for create/update/get/delete
#[derive(Debug, Clone, Default)]
pub struct ApiFlags {
    pub api_name: Option<String>,
    pub base_path: Option<String>,
}

/// Filters for `api list`
#[derive(Debug, Clone)]
pub struct ListFlags {
    pub action: Option<String>,
    pub path: Option<String>,
    pub verb: Option<String>,
    pub skip: u32,
    pub limit: u32,
}

impl Default for ListFlags {
    fn default() -> Self {
        let defaults = ApiListOptions::default();
        Self {
            action: None,
            path: None,
            verb: None,
            skip: defaults.skip,
            limit: defaults.limit,
        }
    }
}

/// Check that a verb belongs to the accepted set (case-insensitive)
pub fn validate_verb(verb: &str) -> Result<ApiVerb, WskError> {
    verb.parse::<ApiVerb>().map_err(|_| {
        tracing::error!("Invalid API verb: {}", verb);
        let valid: Vec<&str> = ApiVerb::ALL.iter().map(|v| v.as_str()).collect();
        WskError::usage(format!(
            "'{}' is not a valid API verb.  Valid values are: {}",
            verb,
            valid.join(", ")
        ))
    })
}

/// Check the positional argument count for a command
pub fn check_args(
    args: &[String],
    min: usize,
    max: usize,
    command: &str,
    required: &str,
) -> Result<(), WskError> {
    if args.len() < min {
        tracing::error!("{} - too few arguments: {:?}", command, args);
        return Err(WskError::usage(format!(
            "Not enough arguments.\n{}",
            required
        )));
    }
    if args.len() > max {
        tracing::error!("{} - too many arguments: {:?}", command, args);
        return Err(WskError::usage(format!(
            "Too many arguments.\n{}",
            required
        )));
    }
    Ok(())
}

fn flag_or_default(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_API_ROOT)
        .to_string()
}

/// Build an [`ApiResource`] from `[path, verb, action?]`.
///
/// The verb is validated and upper-cased, the path is kept verbatim and the
/// optional action must resolve to a non-empty entity name. No I/O happens
/// here.
pub fn parse_api(
    args: &[String],
    flags: &ApiFlags,
    config: &ClientConfig,
) -> Result<ApiResource, WskError> {
    let (path, verb) = match args {
        [path, verb, ..] => (path, verb),
        _ => {
            return Err(WskError::usage(
                "An API path and an API verb are required.",
            ))
        }
    };

    let verb = validate_verb(verb)?;

    let qualified = match args.get(2) {
        Some(raw) => {
            let qualified = QualifiedName::parse(raw, &config.namespace).map_err(|e| {
                tracing::error!("QualifiedName::parse({}) failed: {}", raw, e);
                WskError::usage(format!("'{}' is not a valid action name: {}", raw, e))
                    .with_cause(e)
            })?;
            if qualified.entity_name.is_empty() {
                tracing::error!("Action name '{}' is invalid", raw);
                return Err(WskError::usage(format!(
                    "'{}' is not a valid action name.",
                    raw
                )));
            }
            qualified
        }
        None => QualifiedName::default(),
    };

    let base_path = flag_or_default(&flags.base_path);

    let api = ApiResource {
        namespace: config.namespace.clone(),
        api_collection_name: flag_or_default(&flags.api_name),
        id: ApiResource::derive_id(&config.namespace, &base_path),
        gateway_base_path: base_path,
        // URLs may be case-sensitive
        gateway_rel_path: path.clone(),
        gateway_method: verb.as_str().to_string(),
        gateway_full_path: String::new(),
        bound_action: ActionBinding {
            backend_url: ActionBinding::backend_url_for(
                config.host_authority(),
                &qualified.namespace,
                &qualified.entity_name,
            ),
            backend_method: BACKEND_METHOD.to_string(),
            name: qualified.entity_name,
            namespace: qualified.namespace,
            auth_token: config.auth_token.clone(),
        },
    };

    tracing::debug!("Parsed api struct: {:?}", api.redacted());
    Ok(api)
}

fn parse_for_command(
    args: &[String],
    flags: &ApiFlags,
    config: &ClientConfig,
) -> Result<ApiResource, WskError> {
    parse_api(args, flags, config).map_err(|e| {
        tracing::error!("parse_api({:?}) error: {}", args, e);
        let message = format!("Unable to parse api command arguments: {}", e);
        e.wrap(message)
    })
}

fn output_error(e: std::io::Error) -> WskError {
    WskError::general(format!("Unable to write output: {}", e)).with_cause(e)
}

pub async fn create(
    client: &WhiskClient,
    args: &[String],
    flags: &ApiFlags,
    out: &mut dyn Write,
) -> Result<(), WskError> {
    insert(client, args, flags, out, false).await
}

pub async fn update(
    client: &WhiskClient,
    args: &[String],
    flags: &ApiFlags,
    out: &mut dyn Write,
) -> Result<(), WskError> {
    insert(client, args, flags, out, true).await
}

async fn insert(
    client: &WhiskClient,
    args: &[String],
    flags: &ApiFlags,
    out: &mut dyn Write,
    overwrite: bool,
) -> Result<(), WskError> {
    let command = if overwrite { "Api update" } else { "Api create" };
    check_args(
        args,
        3,
        3,
        command,
        "An API path, an API verb, and an action name are required.",
    )?;

    let api = parse_for_command(args, flags, &client.config)?;

    let stored = client.apis().insert(&api, overwrite).await.map_err(|e| {
        tracing::error!("apis().insert({:?}, {}) error: {:#}", api.redacted(), overwrite, e);
        let action = if overwrite { "update" } else { "create" };
        WskError::remote(format!("Unable to {} api: {:#}", action, e), e)
    })?;

    render::created(out, &api, &stored, overwrite).map_err(output_error)
}

pub async fn get(
    client: &WhiskClient,
    args: &[String],
    flags: &ApiFlags,
    summary: bool,
    out: &mut dyn Write,
) -> Result<(), WskError> {
    check_args(args, 2, 2, "Api get", "An API path and an API verb are required.")?;

    let api = parse_for_command(args, flags, &client.config)?;

    let stored = client.apis().get(&api).await.map_err(|e| {
        tracing::error!("apis().get({}) error: {:#}", api.id, e);
        WskError::remote(format!("Unable to get api: {:#}", e), e)
    })?;

    let rendered = if summary {
        render::summary(out, &stored)
    } else {
        render::fetched(out, &stored)
    };
    rendered.map_err(output_error)
}

pub async fn delete(
    client: &WhiskClient,
    args: &[String],
    flags: &ApiFlags,
    out: &mut dyn Write,
) -> Result<(), WskError> {
    check_args(
        args,
        3,
        3,
        "Api delete",
        "An API path, an API verb, and an action name are required.",
    )?;

    let api = parse_for_command(args, flags, &client.config)?;

    client.apis().delete(&api).await.map_err(|e| {
        tracing::error!("apis().delete({}) error: {:#}", api.id, e);
        WskError::remote(format!("Unable to delete api: {:#}", e), e)
    })?;

    render::deleted(out, &api).map_err(output_error)
}

pub async fn list(
    client: &WhiskClient,
    flags: &ListFlags,
    out: &mut dyn Write,
) -> Result<(), WskError> {
    // An empty verb filter means "any verb"
    let verb = match flags.verb.as_deref().filter(|v| !v.is_empty()) {
        Some(verb) => Some(validate_verb(verb)?.as_str().to_string()),
        None => None,
    };

    let options = ApiListOptions {
        action: flags.action.clone().filter(|a| !a.is_empty()),
        path: flags.path.clone().filter(|p| !p.is_empty()),
        verb,
        skip: flags.skip,
        limit: flags.limit,
        docs: false,
    };

    let apis = client.apis().list(&options).await.map_err(|e| {
        tracing::error!("apis().list({:?}) error: {:#}", options, e);
        WskError::remote(format!("Unable to obtain the list of apis: {:#}", e), e)
    })?;

    render::list(out, &apis).map_err(output_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn config() -> ClientConfig {
        ClientConfig {
            namespace: "guest".to_string(),
            host: "example.com".to_string(),
            auth_token: "user:secret".to_string(),
            insecure: false,
        }
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_api_three_args() {
        let api = parse_api(&args(&["foo/bar", "get", "myaction"]), &ApiFlags::default(), &config())
            .unwrap();
        assert_eq!(api.gateway_rel_path, "foo/bar");
        assert_eq!(api.gateway_method, "GET");
        assert_eq!(api.bound_action.name, "myaction");
        assert_eq!(api.bound_action.namespace, "guest");
        assert_eq!(api.bound_action.backend_method, "POST");
        assert_eq!(api.bound_action.auth_token, "user:secret");
        assert_eq!(
            api.bound_action.backend_url,
            "https://example.com/api/v1/namespaces/guest/actions/myaction?blocking=true"
        );
        assert_eq!(api.namespace, "guest");
    }

    #[test]
    fn test_parse_api_two_args_has_empty_action() {
        let api = parse_api(&args(&["foo/bar", "GET"]), &ApiFlags::default(), &config()).unwrap();
        assert!(api.bound_action.name.is_empty());
        assert!(api.bound_action.namespace.is_empty());
    }

    #[test]
    fn test_parse_api_preserves_path_case() {
        let api = parse_api(&args(&["/Foo/Bar", "post", "act"]), &ApiFlags::default(), &config())
            .unwrap();
        assert_eq!(api.gateway_rel_path, "/Foo/Bar");
        assert_eq!(api.gateway_method, "POST");
    }

    #[test]
    fn test_parse_api_defaults_and_id() {
        let api = parse_api(&args(&["/p", "GET", "act"]), &ApiFlags::default(), &config()).unwrap();
        assert_eq!(api.api_collection_name, "/");
        assert_eq!(api.gateway_base_path, "/");
        assert_eq!(api.id, "guest:/");
    }

    #[test]
    fn test_parse_api_flag_overrides() {
        let flags = ApiFlags {
            api_name: Some("Book Club".to_string()),
            base_path: Some("/club".to_string()),
        };
        let api = parse_api(&args(&["/books", "GET", "getBooks"]), &flags, &config()).unwrap();
        assert_eq!(api.api_collection_name, "Book Club");
        assert_eq!(api.gateway_base_path, "/club");
        assert_eq!(api.id, "guest:/club");
    }

    #[test]
    fn test_parse_api_empty_flag_is_unset() {
        let flags = ApiFlags {
            api_name: Some(String::new()),
            base_path: Some(String::new()),
        };
        let api = parse_api(&args(&["/p", "GET", "act"]), &flags, &config()).unwrap();
        assert_eq!(api.api_collection_name, "/");
        assert_eq!(api.gateway_base_path, "/");
    }

    #[test]
    fn test_parse_api_qualified_action() {
        let api = parse_api(&args(&["/p", "GET", "/other/pkg/act"]), &ApiFlags::default(), &config())
            .unwrap();
        assert_eq!(api.bound_action.namespace, "other");
        assert_eq!(api.bound_action.name, "pkg/act");
        assert_eq!(
            api.bound_action.backend_url,
            "https://example.com/api/v1/namespaces/other/actions/pkg/act?blocking=true"
        );
    }

    #[test]
    fn test_parse_api_rejects_invalid_verb() {
        let err = parse_api(&args(&["/p", "FETCH", "act"]), &ApiFlags::default(), &config())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.display_usage());
        assert_eq!(
            err.message(),
            "'FETCH' is not a valid API verb.  Valid values are: DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT"
        );
    }

    #[test]
    fn test_parse_api_rejects_empty_entity() {
        for raw in ["/", "//", "///", "/guest", "/guest/pkg/", "/guest//act"] {
            let err = parse_api(&args(&["/p", "GET", raw]), &ApiFlags::default(), &config())
                .unwrap_err();
            assert_eq!(err.message(), format!("'{}' is not a valid action name.", raw));
            assert!(err.display_usage());
            assert!(err.cause().is_none());
        }
    }

    #[test]
    fn test_parse_api_wraps_parser_error() {
        let err = parse_api(&args(&["/p", "GET", "/a/b/c/d"]), &ApiFlags::default(), &config())
            .unwrap_err();
        assert!(err.message().starts_with("'/a/b/c/d' is not a valid action name: "));
        assert!(err.cause().is_some());
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_check_args_bounds() {
        assert!(check_args(&args(&["a", "b"]), 2, 2, "Api get", "need two").is_ok());

        let err = check_args(&args(&["a"]), 2, 2, "Api get", "need two").unwrap_err();
        assert_eq!(err.message(), "Not enough arguments.\nneed two");
        assert!(err.display_usage());

        let err = check_args(&args(&["a", "b", "c"]), 2, 2, "Api get", "need two").unwrap_err();
        assert_eq!(err.message(), "Too many arguments.\nneed two");
    }

    #[test]
    fn test_backend_url_strips_scheme_from_host() {
        let mut cfg = config();
        cfg.host = "https://example.com".to_string();
        cfg.namespace = "ns".to_string();
        let api = parse_api(&args(&["/p", "GET", "act"]), &ApiFlags::default(), &cfg).unwrap();
        assert_eq!(
            api.bound_action.backend_url,
            "https://example.com/api/v1/namespaces/ns/actions/act?blocking=true"
        );
    }
}
