// Copy configuration, validated from a flat map of named inputs

use std::collections::HashMap;
use thiserror::Error;

use crate::copy::Mode;
use crate::registry::reference;

pub(crate) const IMAGE_NAME: &str = "IMAGE_NAME";
pub(crate) const VERSION: &str = "VERSION";
pub(crate) const SOURCE_REGISTRY: &str = "SOURCE_REGISTRY";
pub(crate) const SOURCE_ACR: &str = "SOURCE_ACR";
pub(crate) const TARGET_REGISTRY: &str = "TARGET_REGISTRY";
pub(crate) const TARGET_ACR: &str = "TARGET_ACR";
pub(crate) const DRY_RUN: &str = "DRY_RUN";
pub(crate) const MODE: &str = "MODE";
pub(crate) const SKIP_AUTH: &str = "SKIP_AUTH";
pub(crate) const CONTAINER_CLI: &str = "CONTAINER_CLI";

const DEFAULT_CONTAINER_CLI: &str = "docker";

/// One input that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub(crate) fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// All violations found in one pass over the inputs
#[derive(Debug, Clone, Error)]
#[error("Environment validation failed:{}", format_violations(.violations))]
pub(crate) struct ConfigError {
    pub violations: Vec<FieldViolation>,
}

/// One `  - field: reason` line per violation
fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("\n  - {}: {}", v.field, v.reason))
        .collect()
}

/// Validated configuration for a single copy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CopyConfig {
    pub image_name: String,
    pub version: String,
    pub source_registry: String,
    pub target_registry: String,
    pub dry_run: bool,
    pub mode: Mode,
    pub skip_auth: bool,
    pub container_cli: String,
}

impl CopyConfig {
    /// Validate named inputs, collecting every problem before failing
    pub(crate) fn from_inputs(inputs: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut violations = Vec::new();

        let image_name = required(inputs, &[IMAGE_NAME], &mut violations);
        let version = required(inputs, &[VERSION], &mut violations);
        let source_registry = required(inputs, &[SOURCE_REGISTRY, SOURCE_ACR], &mut violations);
        let target_registry = required(inputs, &[TARGET_REGISTRY, TARGET_ACR], &mut violations);

        let mode = match non_empty(inputs, MODE) {
            None => Mode::default(),
            Some(value) => value.parse::<Mode>().unwrap_or_else(|e: anyhow::Error| {
                violations.push(FieldViolation::new(MODE, e.to_string()));
                Mode::default()
            }),
        };

        let container_cli = match inputs.get(CONTAINER_CLI) {
            None => DEFAULT_CONTAINER_CLI.to_string(),
            Some(value) if value.trim().is_empty() => {
                violations.push(FieldViolation::new(CONTAINER_CLI, "must not be empty when set"));
                DEFAULT_CONTAINER_CLI.to_string()
            }
            Some(value) => value.trim().to_string(),
        };

        if !violations.is_empty() {
            return Err(ConfigError { violations });
        }

        Ok(Self {
            image_name,
            version,
            source_registry,
            target_registry,
            dry_run: flag(inputs, DRY_RUN),
            mode,
            skip_auth: flag(inputs, SKIP_AUTH),
            container_cli,
        })
    }

    pub(crate) fn source_reference(&self) -> String {
        reference::source_reference(&self.source_registry, &self.image_name, &self.version)
    }

    pub(crate) fn target_reference(&self) -> String {
        reference::target_reference(&self.target_registry, &self.image_name, &self.version)
    }
}

/// Trimmed value of `key`, treating blank values as unset
fn non_empty<'a>(inputs: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    inputs
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// First non-empty value among `keys`, recording a violation if there is none.
///
/// The violation names the key the caller actually supplied, falling back to
/// the primary key.
fn required(
    inputs: &HashMap<String, String>,
    keys: &[&str],
    violations: &mut Vec<FieldViolation>,
) -> String {
    if let Some(value) = keys.iter().find_map(|key| non_empty(inputs, key)) {
        return value.to_string();
    }

    let field = keys
        .iter()
        .find(|key| inputs.contains_key(**key))
        .unwrap_or(&keys[0]);
    let reason = match keys.iter().find(|key| *key != field) {
        Some(alias) => format!("{} is required (also accepted as {})", field, alias),
        None => format!("{} is required", field),
    };
    violations.push(FieldViolation::new(*field, reason));
    String::new()
}

/// Only the literal "true" enables a flag
fn flag(inputs: &HashMap<String, String>, key: &str) -> bool {
    non_empty(inputs, key) == Some("true")
}
