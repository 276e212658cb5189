//! `package.json` reading.
//!
//! Only the two dependency groups are modelled; every other field of the
//! manifest is ignored.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const MANIFEST_FILE: &str = "package.json";

/// Package name to version range. Insertion ordered.
pub type DependencySet = Map<String, Value>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dependencies: DependencySet,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dev_dependencies: DependencySet,
}

/// A `null` group contributes nothing, same as a missing one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<DependencySet, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DependencySet>::deserialize(deserializer)?.unwrap_or_default())
}

impl Manifest {
    /// Load `package.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        debug!(path = %path.display(), "reading manifest");

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Regular and development dependencies merged into one set.
    ///
    /// A dev entry overrides a regular entry with the same name but keeps
    /// its original position.
    pub fn dependencies(&self) -> DependencySet {
        let mut merged = self.dependencies.clone();
        for (name, range) in &self.dev_dependencies {
            merged.insert(name.clone(), range.clone());
        }
        merged
    }
}
