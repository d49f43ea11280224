//! Qualified entity names
//!
//! A qualified name is either `/namespace[/package]/entity` or a bare
//! `[package/]entity`, in which case the caller's namespace applies.

use thiserror::Error;

/// Largest number of `/`-separated segments in a fully qualified name,
/// counting the empty segment before the leading slash.
const MAX_QUALIFIED_SEGMENTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualifiedNameError {
    #[error("a name must be specified")]
    EmptyName,

    #[error("'{0}' has too many name segments; expected [/namespace][/package]/entity")]
    TooManySegments(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualifiedName {
    pub namespace: String,
    pub entity_name: String,
}

impl QualifiedName {
    pub fn parse(raw: &str, default_namespace: &str) -> Result<Self, QualifiedNameError> {
        if raw.is_empty() {
            return Err(QualifiedNameError::EmptyName);
        }

        let mut qualified = if let Some(rest) = raw.strip_prefix('/') {
            if raw.split('/').count() > MAX_QUALIFIED_SEGMENTS {
                return Err(QualifiedNameError::TooManySegments(raw.to_string()));
            }
            let (namespace, entity) = rest.split_once('/').unwrap_or((rest, ""));
            Self {
                namespace: namespace.to_string(),
                entity_name: entity.to_string(),
            }
        } else {
            if raw.matches('/').count() > 1 {
                return Err(QualifiedNameError::TooManySegments(raw.to_string()));
            }
            Self {
                namespace: default_namespace.to_string(),
                entity_name: raw.to_string(),
            }
        };

        // "pkg/", "/ns//act" and "///" do not name an entity
        if qualified.entity_name.split('/').any(str::is_empty) {
            qualified.entity_name.clear();
        }

        tracing::debug!(
            "Qualified name '{}': namespace='{}' entity='{}'",
            raw,
            qualified.namespace,
            qualified.entity_name
        );

        Ok(qualified)
    }
}
