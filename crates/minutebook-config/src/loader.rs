// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./minutebook.toml` > `~/.config/minutebook/minutebook.toml`
//! > `/etc/minutebook/minutebook.toml`, with `MINUTEBOOK_` environment
//! variables overriding all files.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MinutebookConfig;

const LOCAL_FILE: &str = "minutebook.toml";
const SYSTEM_FILE: &str = "/etc/minutebook/minutebook.toml";

/// Sections that environment keys may address.
const SECTIONS: &[&str] = &["service", "storage", "report", "smtp"];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/minutebook/minutebook.toml`
/// 3. `~/.config/minutebook/minutebook.toml`
/// 4. `./minutebook.toml`
/// 5. `MINUTEBOOK_*` environment variables
pub fn load_config() -> Result<MinutebookConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MinutebookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MinutebookConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MinutebookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MinutebookConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MinutebookConfig::default()))
        .merge(Toml::file(SYSTEM_FILE))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_FILE))
        .merge(env_provider())
}

/// Candidate config files, most specific first.
pub fn config_file_candidates() -> Vec<std::path::PathBuf> {
    let mut paths = vec![std::path::PathBuf::from(LOCAL_FILE)];
    if let Some(user) = user_config_path() {
        paths.push(user);
    }
    paths.push(std::path::PathBuf::from(SYSTEM_FILE));
    paths
}

fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("minutebook").join(LOCAL_FILE))
}

/// Environment provider mapping `MINUTEBOOK_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `MINUTEBOOK_REPORT_MAX_VERSION_RETRIES` maps to
/// `report.max_version_retries`.
fn env_provider() -> Env {
    Env::prefixed("MINUTEBOOK_").map(|key| {
        let key_str = key.as_str();
        SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or_else(|| key_str.to_string())
            .into()
    })
}
