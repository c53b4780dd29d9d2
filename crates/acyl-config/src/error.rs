//! Configuration parsing errors.

use derive_more::Display;
use thiserror::Error;

/// The kind of entry a delimited configuration string carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    #[display("label")]
    Label,
    #[display("group binding")]
    GroupBinding,
    #[display("privileged repo")]
    PrivilegedRepo,
    #[display("secret injection")]
    SecretInjection,
}

/// The nested JSON mappings of the Amino backend configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AminoField {
    #[display("HelmChartToRepo")]
    HelmChartToRepo,
    #[display("AminoDeploymentToRepo")]
    DeploymentToRepo,
    #[display("AminoJobToRepo")]
    JobToRepo,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one {0} should be provided")]
    EmptyInput(EntryKind),

    #[error("malformed {kind} at offset {offset}: {entry}")]
    Malformed {
        kind: EntryKind,
        offset: usize,
        entry: String,
    },

    #[error("empty {kind} at offset {offset}: {entry}")]
    EmptyField {
        kind: EntryKind,
        offset: usize,
        entry: String,
    },

    #[error("error fetching secret for id: {id}")]
    SecretFetch {
        id: String,
        #[source]
        source: acyl_core::Error,
    },

    #[error("error unmarshaling secret for id: {id}")]
    SecretDecode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("error unmarshaling {field}: {source}")]
    JsonDecode {
        field: AminoField,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn malformed(kind: EntryKind, offset: usize, entry: &str) -> Self {
        Self::Malformed {
            kind,
            offset,
            entry: entry.to_string(),
        }
    }

    pub(crate) fn empty_field(kind: EntryKind, offset: usize, entry: &str) -> Self {
        Self::EmptyField {
            kind,
            offset,
            entry: entry.to_string(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
