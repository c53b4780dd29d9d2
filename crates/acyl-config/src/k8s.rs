//! Kubernetes environment configuration.
//!
//! Operators supply these options as delimiter-encoded strings:
//! - labels: `acyl.dev/managed-by=nitro,istio-injection=enabled`
//! - group bindings: `group1=role1,group2=role2`
//! - privileged repos: `owner1/repo1,owner2/repo2`
//! - secret injections: `name1=secretid1,name2=secretid2`
//!
//! Each parser returns a freshly built value or the first error found. Within
//! a mapping, a later duplicate key replaces the earlier one.
//!
//! Labels and privileged repos reject an empty string. Group bindings and
//! secret injections skip empty entries, so an empty string means "none".

use crate::split::{self, FIELD_DELIMITER, Field, PAIR_DELIMITER, REPO_DELIMITER};
use crate::{ConfigError, ConfigResult, EntryKind};
use acyl_core::{K8sSecret, SecretFetcher};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Raw Kubernetes options as handed over by the configuration loader.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawK8sConfig {
    pub labels: String,
    pub group_bindings: String,
    pub privileged_repos: String,
    pub secret_injections: String,
}

/// Validated Kubernetes environment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct K8sConfig {
    /// Kubernetes group name to cluster role.
    pub group_bindings: HashMap<String, String>,
    /// `owner/repo` names whose environment service accounts get
    /// cluster-admin privileges.
    pub privileged_repo_whitelist: Vec<String>,
    /// Secret name to secret injected into each environment namespace.
    pub secret_injections: HashMap<String, K8sSecret>,
    /// Labels attached to every object Acyl creates. Never empty once
    /// processed: cleanup selects orphaned resources by these labels, and an
    /// empty selector would match everything.
    pub labels: HashMap<String, String>,
}

impl K8sConfig {
    /// Parse and validate every option, stopping at the first error.
    pub fn from_raw<F: SecretFetcher + ?Sized>(
        raw: &RawK8sConfig,
        fetcher: &F,
    ) -> ConfigResult<Self> {
        Ok(Self {
            labels: parse_labels(&raw.labels)?,
            group_bindings: parse_group_bindings(&raw.group_bindings)?,
            privileged_repo_whitelist: parse_privileged_repos(&raw.privileged_repos)?,
            secret_injections: resolve_secret_injections(fetcher, &raw.secret_injections)?,
        })
    }

    /// Populate `labels`. The field is left untouched on error.
    pub fn process_labels(&mut self, raw: &str) -> ConfigResult<()> {
        self.labels = parse_labels(raw)?;
        Ok(())
    }

    /// Populate `group_bindings`. The field is left untouched on error.
    pub fn process_group_bindings(&mut self, raw: &str) -> ConfigResult<()> {
        self.group_bindings = parse_group_bindings(raw)?;
        Ok(())
    }

    /// Populate `privileged_repo_whitelist`. The field is left untouched on
    /// error.
    pub fn process_privileged_repos(&mut self, raw: &str) -> ConfigResult<()> {
        self.privileged_repo_whitelist = parse_privileged_repos(raw)?;
        Ok(())
    }

    /// Populate `secret_injections` using `fetcher`. The field is left
    /// untouched on error.
    pub fn process_secret_injections<F: SecretFetcher + ?Sized>(
        &mut self,
        fetcher: &F,
        raw: &str,
    ) -> ConfigResult<()> {
        self.secret_injections = resolve_secret_injections(fetcher, raw)?;
        Ok(())
    }

    /// Whether an object carrying `object_labels` is managed by Acyl.
    ///
    /// Every configured label must be present with the same value. Always
    /// false while no labels are configured.
    pub fn is_managed(&self, object_labels: &HashMap<String, String>) -> bool {
        !self.labels.is_empty()
            && self
                .labels
                .iter()
                .all(|(key, value)| object_labels.get(key) == Some(value))
    }

    /// Kubernetes label selector matching managed objects, e.g.
    /// `acyl.dev/managed-by=nitro,istio-injection=enabled`. Keys are sorted.
    pub fn label_selector(&self) -> String {
        let mut pairs: Vec<_> = self.labels.iter().collect();
        pairs.sort();
        pairs
            .into_iter()
            .map(|(key, value)| format!("{key}{PAIR_DELIMITER}{value}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether `repo` (`owner/name`) is on the privileged whitelist.
    pub fn is_privileged(&self, repo: &str) -> bool {
        self.privileged_repo_whitelist.iter().any(|r| r == repo)
    }
}

/// Parse a comma-separated list of `key=value` labels.
///
/// At least one label is required.
pub fn parse_labels(raw: &str) -> ConfigResult<HashMap<String, String>> {
    // Splitting "" yields one empty field, so emptiness is checked up front.
    if raw.is_empty() {
        return Err(ConfigError::EmptyInput(EntryKind::Label));
    }
    let labels = parse_pairs(raw, EntryKind::Label, false)?;
    debug!(count = labels.len(), "Parsed labels");
    Ok(labels)
}

/// Parse a comma-separated list of `group=role` bindings.
pub fn parse_group_bindings(raw: &str) -> ConfigResult<HashMap<String, String>> {
    let bindings = parse_pairs(raw, EntryKind::GroupBinding, true)?;
    debug!(count = bindings.len(), "Parsed group bindings");
    Ok(bindings)
}

/// Parse a comma-separated list of `owner/repo` names, preserving order.
pub fn parse_privileged_repos(raw: &str) -> ConfigResult<Vec<String>> {
    let mut repos = Vec::new();
    for field in split::fields(raw, FIELD_DELIMITER) {
        match split::pair(field.raw, REPO_DELIMITER) {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                repos.push(field.raw.to_string());
            }
            _ => {
                return Err(ConfigError::malformed(
                    EntryKind::PrivilegedRepo,
                    field.offset,
                    field.raw,
                ));
            }
        }
    }
    debug!(count = repos.len(), "Parsed privileged repo whitelist");
    Ok(repos)
}

/// Parse a comma-separated list of `name=secret-id` injections and resolve
/// each id through `fetcher`, one at a time in input order.
pub fn resolve_secret_injections<F: SecretFetcher + ?Sized>(
    fetcher: &F,
    raw: &str,
) -> ConfigResult<HashMap<String, K8sSecret>> {
    let mut injections = HashMap::new();
    for field in split::fields(raw, FIELD_DELIMITER) {
        if field.is_empty() {
            continue;
        }
        let (name, id) = key_value(field, EntryKind::SecretInjection)?;

        let payload = fetcher.get(id).map_err(|source| ConfigError::SecretFetch {
            id: id.to_string(),
            source,
        })?;
        let secret = K8sSecret::from_json(&payload).map_err(|source| {
            ConfigError::SecretDecode {
                id: id.to_string(),
                source,
            }
        })?;

        debug!(injection = name, id, secret_type = %secret.secret_type, "Resolved secret injection");
        if injections.insert(name.to_string(), secret).is_some() {
            warn!(
                kind = %EntryKind::SecretInjection,
                key = name,
                "Duplicate key overrides earlier entry"
            );
        }
    }
    debug!(count = injections.len(), "Resolved secret injections");
    Ok(injections)
}

fn parse_pairs(
    raw: &str,
    kind: EntryKind,
    skip_empty: bool,
) -> ConfigResult<HashMap<String, String>> {
    let mut out = HashMap::new();
    for field in split::fields(raw, FIELD_DELIMITER) {
        if skip_empty && field.is_empty() {
            continue;
        }
        let (key, value) = key_value(field, kind)?;
        if out.insert(key.to_string(), value.to_string()).is_some() {
            warn!(kind = %kind, key, "Duplicate key overrides earlier entry");
        }
    }
    Ok(out)
}

/// Split a field into a non-empty key and value.
fn key_value(field: Field<'_>, kind: EntryKind) -> ConfigResult<(&str, &str)> {
    let (key, value) = split::pair(field.raw, PAIR_DELIMITER)
        .ok_or_else(|| ConfigError::malformed(kind, field.offset, field.raw))?;
    if key.is_empty() || value.is_empty() {
        return Err(ConfigError::empty_field(kind, field.offset, field.raw));
    }
    Ok((key, value))
}
