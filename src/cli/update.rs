//! Update command - update every package under a scope.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, instrument};

use crate::locator::Locator;
use crate::npm::{Executor, SystemExecutor, UpdateMode, DEFAULT_PROGRAM};
use crate::scope::Scope;
use crate::updater::{Outcome, Updater};

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Package scope to update (e.g. 'acme' or '@acme')
    pub scope: Option<String>,

    /// Update globally installed packages instead of package.json dependencies
    #[arg(short, long)]
    pub global: bool,

    /// Reinstall each package at its latest version instead of updating within range
    #[arg(short, long)]
    pub force: bool,

    /// Print the npm command instead of running it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Directory containing package.json (default: current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Package manager executable
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_PROGRAM)]
    pub npm: String,
}

/// Everything a run needs besides the scope, resolved from the process.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dir: PathBuf,
    pub program: String,
    pub mode: UpdateMode,
    pub dry_run: bool,
}

impl RunOptions {
    fn from_args(args: &UpdateArgs) -> Result<Self> {
        let dir = match &args.dir {
            Some(dir) => dir.clone(),
            None => env::current_dir().context("failed to get current directory")?,
        };

        Ok(Self {
            dir,
            program: args.npm.clone(),
            mode: UpdateMode {
                global: args.global,
                force: args.force,
            },
            dry_run: args.dry_run,
        })
    }

    fn locator(&self) -> Locator {
        if self.mode.global {
            Locator::Global {
                program: self.program.clone(),
            }
        } else {
            Locator::Local {
                dir: self.dir.clone(),
            }
        }
    }
}

pub fn cmd_update(args: UpdateArgs) -> Result<()> {
    let Some(raw_scope) = args.scope.as_deref().filter(|s| !s.is_empty()) else {
        anyhow::bail!("please provide a scope as a CLI argument");
    };

    let scope = Scope::new(raw_scope);
    let options = RunOptions::from_args(&args)?;
    execute(&scope, &options, &SystemExecutor)?;
    Ok(())
}

/// Locate the packages under `scope` and update them.
#[instrument(level = "debug", skip_all, fields(scope = %scope, global = options.mode.global))]
pub fn execute(scope: &Scope, options: &RunOptions, executor: &dyn Executor) -> Result<Outcome> {
    debug!(dir = %options.dir.display(), program = %options.program, "locating packages");
    let packages = options.locator().locate(scope, executor)?;

    Updater::new(executor, &options.program, options.mode)
        .dry_run(options.dry_run)
        .update(scope, &packages)
}
