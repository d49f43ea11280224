//! Property-based tests using proptest
//!
//! These tests check verb validation and the request builder over
//! randomized inputs.

use proptest::prelude::*;
use wsk_api::commands::api::{parse_api, validate_verb, ApiFlags};
use wsk_api::config::ClientConfig;
use wsk_api::whisk::api::ApiVerb;
use wsk_api::ErrorKind;

fn config(namespace: &str, host: &str) -> ClientConfig {
    ClientConfig {
        namespace: namespace.to_string(),
        host: host.to_string(),
        auth_token: "user:key".to_string(),
        insecure: false,
    }
}

/// Any accepted verb in random letter case
fn arb_verb_any_case() -> impl Strategy<Value = String> {
    (prop::sample::select(ApiVerb::ALL.to_vec()), any::<u64>()).prop_map(|(verb, mask)| {
        verb.as_str()
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if mask & (1 << (i % 64)) != 0 {
                    c.to_ascii_lowercase()
                } else {
                    c
                }
            })
            .collect()
    })
}

fn is_accepted(verb: &str) -> bool {
    ApiVerb::ALL
        .iter()
        .any(|v| v.as_str().eq_ignore_ascii_case(verb))
}

proptest! {
    /// Accepted verbs validate in any case
    #[test]
    fn accepted_verbs_validate(verb in arb_verb_any_case()) {
        prop_assert!(validate_verb(&verb).is_ok());
        prop_assert!(validate_verb(&verb.to_lowercase()).is_ok());
    }

    /// Everything else is a usage error, in either case
    #[test]
    fn other_verbs_are_rejected(verb in "[A-Za-z]{1,10}") {
        prop_assume!(!is_accepted(&verb));
        for candidate in [verb.clone(), verb.to_lowercase()] {
            let err = validate_verb(&candidate).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::Usage);
            prop_assert!(err.display_usage());
        }
    }

    /// The method is stored upper-cased and the path verbatim
    #[test]
    fn builder_normalizes_verb_keeps_path(
        path in "/[A-Za-z0-9/_-]{0,30}",
        verb in arb_verb_any_case(),
        action in "[a-z][a-zA-Z0-9_]{0,20}",
    ) {
        let args = vec![path.clone(), verb.clone(), action.clone()];
        let api = parse_api(&args, &ApiFlags::default(), &config("guest", "example.com")).unwrap();
        prop_assert_eq!(api.gateway_rel_path, path);
        prop_assert_eq!(api.gateway_method, verb.to_uppercase());
        prop_assert_eq!(api.bound_action.name, action);
        prop_assert_eq!(api.bound_action.backend_method, "POST");
    }

    /// The id depends only on namespace and base path, and building is deterministic
    #[test]
    fn builder_id_is_deterministic(
        namespace in "[a-z_][a-z0-9_]{0,15}",
        base_path in prop::option::of("/[a-z]{1,10}"),
        api_name in prop::option::of("[A-Za-z ]{1,10}"),
    ) {
        let flags = ApiFlags { api_name, base_path: base_path.clone() };
        let cfg = config(&namespace, "example.com");
        let args = vec!["/p".to_string(), "GET".to_string(), "act".to_string()];

        let first = parse_api(&args, &flags, &cfg).unwrap();
        let second = parse_api(&args, &flags, &cfg).unwrap();

        let expected_base = base_path.unwrap_or_else(|| "/".to_string());
        prop_assert_eq!(&first.id, &format!("{}:{}", namespace, expected_base));
        prop_assert_eq!(first, second);
    }

    /// The backend URL is synthesized from host, namespace and action
    #[test]
    fn backend_url_format(
        host in "[a-z]{1,10}\\.[a-z]{2,3}",
        namespace in "[a-z]{1,10}",
        action in "[a-z]{1,10}",
    ) {
        let args = vec!["/p".to_string(), "GET".to_string(), format!("/{}/{}", namespace, action)];
        let api = parse_api(&args, &ApiFlags::default(), &config("guest", &host)).unwrap();
        prop_assert_eq!(
            api.bound_action.backend_url,
            format!("https://{}/api/v1/namespaces/{}/actions/{}?blocking=true", host, namespace, action)
        );
    }
}

#[test]
fn backend_url_example() {
    let args = vec!["/p".to_string(), "GET".to_string(), "act".to_string()];
    let api = parse_api(&args, &ApiFlags::default(), &config("ns", "example.com")).unwrap();
    assert_eq!(
        api.bound_action.backend_url,
        "https://example.com/api/v1/namespaces/ns/actions/act?blocking=true"
    );
}

#[test]
fn separator_only_action_is_rejected() {
    for raw in ["/", "//", "///", "/ns/pkg/", "/ns//act"] {
        let args = vec!["/p".to_string(), "GET".to_string(), raw.to_string()];
        let err = parse_api(&args, &ApiFlags::default(), &config("ns", "example.com")).unwrap_err();
        assert_eq!(err.message(), format!("'{}' is not a valid action name.", raw));
    }
}
