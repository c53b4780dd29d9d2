//! Parsing and validation of Acyl environment configuration.
//!
//! This crate handles:
//! - Splitting delimiter-encoded option strings
//! - Kubernetes labels, group bindings, privileged repos and secret injections
//! - Amino name-to-repository JSON mappings

pub mod amino;
pub mod error;
pub mod k8s;
pub mod split;

pub use amino::{AminoConfig, RawAminoConfig};
pub use error::{AminoField, ConfigError, ConfigResult, EntryKind};
pub use k8s::{
    K8sConfig, RawK8sConfig, parse_group_bindings, parse_labels, parse_privileged_repos,
    resolve_secret_injections,
};
