//! Core domain types and traits for Acyl environment provisioning.
//!
//! This crate contains:
//! - Kubernetes secret records injected into environment namespaces
//! - The secret fetching abstraction used to resolve them
//! - Error types shared by secret backends

pub mod error;
pub mod secret;

pub use error::{Error, Result};
pub use secret::{K8sSecret, SecretFetcher, StaticSecretFetcher};
