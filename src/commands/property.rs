//! `wsk property` command handlers

use crate::config::{ClientConfig, Config};
use crate::error::WskError;
use std::io::Write;
use std::path::Path;

/// Values to persist; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct PropertyValues {
    pub apihost: Option<String>,
    pub auth: Option<String>,
    pub namespace: Option<String>,
}

impl PropertyValues {
    fn is_empty(&self) -> bool {
        self.apihost.is_none() && self.auth.is_none() && self.namespace.is_none()
    }
}

/// Show a secret's first characters only
fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}***", visible)
}

pub fn set(path: &Path, values: &PropertyValues, out: &mut dyn Write) -> Result<(), WskError> {
    if values.is_empty() {
        return Err(WskError::usage(
            "At least one of --apihost, --auth or --namespace is required.",
        ));
    }

    let mut config = Config::load_from(path);
    let mut changed = Vec::new();

    if let Some(host) = &values.apihost {
        config.apihost = Some(host.clone());
        changed.push(format!("ok: whisk API host set to {}", host));
    }
    if let Some(auth) = &values.auth {
        config.auth = Some(auth.clone());
        changed.push("ok: whisk auth set".to_string());
    }
    if let Some(namespace) = &values.namespace {
        config.namespace = Some(namespace.clone());
        changed.push(format!("ok: whisk namespace set to {}", namespace));
    }

    config.save_to(path).map_err(|e| {
        tracing::error!("Config::save_to({:?}) error: {:#}", path, e);
        WskError::general(format!("Unable to save configuration: {:#}", e)).with_cause(e)
    })?;

    for line in changed {
        writeln!(out, "{}", line)
            .map_err(|e| WskError::general(format!("Unable to write output: {}", e)))?;
    }
    Ok(())
}

pub fn get(config: &ClientConfig, out: &mut dyn Write) -> Result<(), WskError> {
    let result = writeln!(out, "whisk API host\t\t{}", config.host)
        .and_then(|_| writeln!(out, "whisk auth\t\t{}", mask(&config.auth_token)))
        .and_then(|_| writeln!(out, "whisk namespace\t\t{}", config.namespace));
    result.map_err(|e| WskError::general(format!("Unable to write output: {}", e)))
}
