//! Finding the packages under a scope, either in `package.json` or in the
//! global npm installation.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::manifest::Manifest;
use crate::npm::{global_list_command, Executor};
use crate::scope::Scope;

/// Where installed packages are listed.
#[derive(Debug, Clone)]
pub enum Locator {
    /// `package.json` in the given directory.
    Local { dir: PathBuf },
    /// `npm ls -g` through the given npm program.
    Global { program: String },
}

/// Shape of `npm ls --json` output; only the top-level names are needed.
#[derive(Debug, Default, Deserialize)]
struct GlobalListing {
    #[serde(default)]
    dependencies: Map<String, Value>,
}

impl Locator {
    /// Packages whose names start with `scope`, in source order.
    ///
    /// An empty result is not an error.
    #[instrument(level = "debug", skip_all, fields(scope = %scope))]
    pub fn locate(&self, scope: &Scope, executor: &dyn Executor) -> Result<Vec<String>> {
        let selected = match self {
            Locator::Local { dir } => {
                let manifest = Manifest::load(dir)?;
                scope.select(manifest.dependencies().keys())
            }
            Locator::Global { program } => {
                let names = list_global(program, executor)?;
                scope.select(names)
            }
        };

        if selected.is_empty() {
            info!("No packages found with the scope {}", scope);
        } else {
            debug!(count = selected.len(), "selected packages");
        }

        Ok(selected)
    }
}

/// Names of globally installed packages, in npm's output order.
fn list_global(program: &str, executor: &dyn Executor) -> Result<Vec<String>> {
    let cmd = global_list_command(program);
    let output = executor
        .listing(&cmd)
        .context("failed to list global packages")?;

    let listing: GlobalListing =
        serde_json::from_str(&output).context("failed to parse global package list")?;
    Ok(listing.dependencies.into_iter().map(|(name, _)| name).collect())
}
