//! Running the npm update for the selected packages.

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, info, instrument};

use crate::npm::{update_command, Executor, NpmCommand, UpdateMode};
use crate::progress;
use crate::scope::Scope;

/// What happened to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing under the scope; npm was not invoked.
    NothingToUpdate,
    /// The command was printed, not run.
    DryRun(NpmCommand),
    /// npm ran successfully.
    Updated(NpmCommand),
}

pub struct Updater<'a> {
    executor: &'a dyn Executor,
    program: String,
    mode: UpdateMode,
    dry_run: bool,
}

impl<'a> Updater<'a> {
    pub fn new(executor: &'a dyn Executor, program: &str, mode: UpdateMode) -> Self {
        Self {
            executor,
            program: program.to_string(),
            mode,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Update `packages` with a single npm invocation.
    #[instrument(level = "debug", skip_all, fields(scope = %scope, count = packages.len()))]
    pub fn update(&self, scope: &Scope, packages: &[String]) -> Result<Outcome> {
        if packages.is_empty() {
            debug!("nothing to update");
            return Ok(Outcome::NothingToUpdate);
        }

        let cmd = update_command(&self.program, packages, self.mode);

        info!("Updating packages with the scope {}:", scope);
        for package in packages {
            println!(
                "  {}",
                package.if_supports_color(Stream::Stdout, |p| p.cyan())
            );
        }

        if self.dry_run {
            println!("{}", cmd.format_command());
            return Ok(Outcome::DryRun(cmd));
        }

        let line = cmd.format_command();
        let status = progress::running(&line);
        let result = self.executor.output(&cmd);
        status.finish_and_clear();

        let stdout = result.with_context(|| format!("failed to update packages with '{}'", line))?;
        if stdout.is_empty() {
            info!("Packages updated successfully");
        } else {
            info!("Packages updated successfully:\n{}", stdout);
        }

        Ok(Outcome::Updated(cmd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npm::fake::FakeExecutor;

    fn packages(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_selection_skips_npm() {
        let executor = FakeExecutor::new();
        let updater = Updater::new(&executor, "npm", UpdateMode::default());

        let outcome = updater.update(&Scope::new("acme"), &[]).unwrap();
        assert_eq!(outcome, Outcome::NothingToUpdate);
        assert!(executor.ran().is_empty());
    }

    #[test]
    fn test_update_runs_one_command() {
        let executor = FakeExecutor::new().respond("updated 2 packages");
        let updater = Updater::new(&executor, "npm", UpdateMode::default());

        let outcome = updater
            .update(&Scope::new("acme"), &packages(&["@acme/a", "@acme/b"]))
            .unwrap();
        assert!(matches!(outcome, Outcome::Updated(_)));
        assert_eq!(executor.ran(), vec!["npm update @acme/a @acme/b"]);
    }

    #[test]
    fn test_force_installs_latest() {
        let executor = FakeExecutor::new();
        let mode = UpdateMode {
            global: false,
            force: true,
        };
        Updater::new(&executor, "npm", mode)
            .update(&Scope::new("acme"), &packages(&["@acme/a", "@acme/b"]))
            .unwrap();
        assert_eq!(
            executor.ran(),
            vec!["npm install @acme/a@latest @acme/b@latest"]
        );
    }

    #[test]
    fn test_global_mode_adds_flag() {
        let executor = FakeExecutor::new();
        let mode = UpdateMode {
            global: true,
            force: false,
        };
        Updater::new(&executor, "npm", mode)
            .update(&Scope::new("acme"), &packages(&["@acme/cli"]))
            .unwrap();
        assert!(executor.ran()[0].split(' ').any(|token| token == "-g"));
    }

    #[test]
    fn test_failure_is_reported() {
        let executor = FakeExecutor::new().fail("ERESOLVE unable to resolve dependency tree");
        let updater = Updater::new(&executor, "npm", UpdateMode::default());

        let err = updater
            .update(&Scope::new("acme"), &packages(&["@acme/a"]))
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("failed to update packages"));
        assert!(message.contains("ERESOLVE"));
    }

    #[test]
    fn test_dry_run_does_not_execute() {
        let executor = FakeExecutor::new();
        let outcome = Updater::new(&executor, "npm", UpdateMode::default())
            .dry_run(true)
            .update(&Scope::new("acme"), &packages(&["@acme/a"]))
            .unwrap();

        match outcome {
            Outcome::DryRun(cmd) => assert_eq!(cmd.format_command(), "npm update @acme/a"),
            other => panic!("expected dry run, got {:?}", other),
        }
        assert!(executor.ran().is_empty());
    }
}
