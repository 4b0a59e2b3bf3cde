//! Profile resolution and custom schema files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use intake_model::{FieldTarget, TargetSchema};
use intake_wizard::WizardProfile;

/// The built-in profile for `key`, with its schema replaced by the one in
/// `schema_file` when given.
pub fn resolve_profile(key: &str, schema_file: Option<&Path>) -> Result<WizardProfile> {
    let profile = WizardProfile::by_key(key).ok_or_else(|| anyhow!("unknown profile '{key}'"))?;
    match schema_file {
        Some(path) => Ok(profile.with_schema(load_schema(path)?)),
        None => Ok(profile),
    }
}

pub fn load_schema(path: &Path) -> Result<TargetSchema> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse schema {}", path.display()))
}

/// Parse a `COLUMN=FIELD` argument. An empty field unmaps the column.
pub fn parse_mapping_arg(raw: &str) -> Result<(String, FieldTarget)> {
    let Some((column, field)) = raw.split_once('=') else {
        bail!("mapping '{raw}' must look like COLUMN=FIELD");
    };
    let column = column.trim();
    if column.is_empty() {
        bail!("mapping '{raw}' has no column name");
    }
    Ok((column.to_string(), FieldTarget::field(field)))
}
