//! Output rendering for API commands

use crate::whisk::api::ApiResource;
use std::io::{self, Write};

fn full_path(api: &ApiResource) -> String {
    if !api.gateway_full_path.is_empty() {
        return api.gateway_full_path.clone();
    }
    let base = api.gateway_base_path.trim_end_matches('/');
    let rel = api.gateway_rel_path.trim_start_matches('/');
    format!("{}/{}", base, rel)
}

fn action_label(api: &ApiResource) -> String {
    let action = &api.bound_action;
    if action.namespace.is_empty() {
        action.name.clone()
    } else {
        format!("/{}/{}", action.namespace, action.name)
    }
}

/// `sent` is what the client built, `stored` is the gateway's copy
pub fn created(
    out: &mut dyn Write,
    sent: &ApiResource,
    stored: &ApiResource,
    updated: bool,
) -> io::Result<()> {
    let verb = if updated { "updated" } else { "created" };
    writeln!(
        out,
        "ok: {} api {} {} for action {}",
        verb, sent.gateway_rel_path, sent.gateway_method, sent.bound_action.name
    )?;
    if !stored.gateway_full_path.is_empty() {
        writeln!(out, "{}", stored.gateway_full_path)?;
    }
    Ok(())
}

pub fn fetched(out: &mut dyn Write, api: &ApiResource) -> io::Result<()> {
    writeln!(
        out,
        "ok: api for path {} verb {}",
        api.gateway_rel_path, api.gateway_method
    )?;
    json(out, api)
}

pub fn summary(out: &mut dyn Write, api: &ApiResource) -> io::Result<()> {
    writeln!(out, "api {} {}", full_path(api), api.gateway_method)?;
    if !api.bound_action.name.is_empty() {
        writeln!(out, "   action {}", action_label(api))?;
    }
    if !api.api_collection_name.is_empty() {
        writeln!(out, "   name {}", api.api_collection_name)?;
    }
    Ok(())
}

pub fn deleted(out: &mut dyn Write, api: &ApiResource) -> io::Result<()> {
    writeln!(
        out,
        "ok: deleted api {} {}",
        api.gateway_rel_path, api.gateway_method
    )
}

pub fn list(out: &mut dyn Write, apis: &[ApiResource]) -> io::Result<()> {
    writeln!(out, "apis")?;
    for api in apis {
        writeln!(
            out,
            "{:<60} {:<8} {}",
            full_path(api),
            api.gateway_method,
            action_label(api)
        )?;
    }
    Ok(())
}

pub fn json(out: &mut dyn Write, api: &ApiResource) -> io::Result<()> {
    // Never echo the action's auth key back to the terminal
    let value = serde_json::to_string_pretty(&api.redacted()).map_err(io::Error::other)?;
    writeln!(out, "{}", value)
}
