//! Amino backend configuration.
//!
//! Three options arrive as JSON objects mapping a Helm chart, Amino
//! deployment, or Amino job name to the repository that builds it.

use crate::{AminoField, ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Raw JSON strings as handed over by the configuration loader.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAminoConfig {
    pub helm_chart_to_repo: String,
    pub deployment_to_repo: String,
    pub job_to_repo: String,
}

/// Decoded Amino name-to-repository mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AminoConfig {
    pub helm_chart_to_repo: HashMap<String, String>,
    pub deployment_to_repo: HashMap<String, String>,
    pub job_to_repo: HashMap<String, String>,
}

impl RawAminoConfig {
    /// Decode the mappings in order (chart, deployment, job), stopping at the
    /// first failure.
    pub fn parse(&self) -> ConfigResult<AminoConfig> {
        let config = AminoConfig {
            helm_chart_to_repo: decode(AminoField::HelmChartToRepo, &self.helm_chart_to_repo)?,
            deployment_to_repo: decode(AminoField::DeploymentToRepo, &self.deployment_to_repo)?,
            job_to_repo: decode(AminoField::JobToRepo, &self.job_to_repo)?,
        };
        debug!(
            charts = config.helm_chart_to_repo.len(),
            deployments = config.deployment_to_repo.len(),
            jobs = config.job_to_repo.len(),
            "Parsed Amino config"
        );
        Ok(config)
    }
}

impl AminoConfig {
    pub fn repo_for_chart(&self, chart: &str) -> Option<&str> {
        self.helm_chart_to_repo.get(chart).map(String::as_str)
    }

    pub fn repo_for_deployment(&self, deployment: &str) -> Option<&str> {
        self.deployment_to_repo.get(deployment).map(String::as_str)
    }

    pub fn repo_for_job(&self, job: &str) -> Option<&str> {
        self.job_to_repo.get(job).map(String::as_str)
    }
}

/// `null` decodes to an empty mapping.
fn decode(field: AminoField, raw: &str) -> ConfigResult<HashMap<String, String>> {
    serde_json::from_str::<Option<HashMap<String, String>>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|source| ConfigError::JsonDecode { field, source })
}
