//! npm command lines and the executor that runs them.

use anyhow::{Context, Result};
use std::process::{Command, Output};

pub const DEFAULT_PROGRAM: &str = "npm";

/// Token that points npm at the global installation.
pub const GLOBAL_FLAG: &str = "-g";

/// A single npm invocation: program plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmCommand {
    program: String,
    args: Vec<String>,
}

impl NpmCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<String>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// The command as a single shell-like line.
    pub fn format_command(&self) -> String {
        if self.args.is_empty() {
            return self.program.clone();
        }
        format!("{} {}", self.program, self.args.join(" "))
    }
}

/// How the update command should be built.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateMode {
    pub global: bool,
    pub force: bool,
}

/// `npm update [-g] <pkg>...`, or `npm install [-g] <pkg>@latest...` when forced.
pub fn update_command(program: &str, packages: &[String], mode: UpdateMode) -> NpmCommand {
    let mut cmd = NpmCommand::new(program);
    cmd.arg(if mode.force { "install" } else { "update" });

    if mode.global {
        cmd.arg(GLOBAL_FLAG);
    }

    if mode.force {
        cmd.args(packages.iter().map(|p| format!("{}@latest", p)));
    } else {
        cmd.args(packages.iter().cloned());
    }
    cmd
}

/// `npm ls -g --depth=0 --json`
pub fn global_list_command(program: &str) -> NpmCommand {
    let mut cmd = NpmCommand::new(program);
    cmd.args(["ls", GLOBAL_FLAG, "--depth=0", "--json"]);
    cmd
}

/// Runs npm commands. Swapped for a fake in tests.
pub trait Executor {
    /// Run `cmd` to completion and return its standard output.
    fn output(&self, cmd: &NpmCommand) -> Result<String>;

    /// Like [`Executor::output`], but a non-zero exit still yields stdout when
    /// there is any. `npm ls` exits 1 on extraneous or invalid packages while
    /// printing a complete listing.
    fn listing(&self, cmd: &NpmCommand) -> Result<String> {
        self.output(cmd)
    }
}

/// Spawns real subprocesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn spawn(cmd: &NpmCommand) -> Result<Output> {
        tracing::debug!("+ {}", cmd.format_command());

        Command::new(cmd.program())
            .args(cmd.get_args())
            .output()
            .with_context(|| format!("Failed to run {}", cmd.program()))
    }
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn failure(cmd: &NpmCommand, output: &Output) -> anyhow::Error {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::anyhow!(
        "Command failed with exit code {}: {}\n{}",
        output.status.code().unwrap_or(1),
        cmd.format_command(),
        stderr.trim()
    )
}

impl Executor for SystemExecutor {
    fn output(&self, cmd: &NpmCommand) -> Result<String> {
        let output = Self::spawn(cmd)?;
        if !output.status.success() {
            return Err(failure(cmd, &output));
        }
        Ok(stdout_of(&output))
    }

    fn listing(&self, cmd: &NpmCommand) -> Result<String> {
        let output = Self::spawn(cmd)?;
        let stdout = stdout_of(&output);
        if !output.status.success() {
            if stdout.is_empty() {
                return Err(failure(cmd, &output));
            }
            tracing::warn!(
                "{} exited with code {}, using its output anyway",
                cmd.format_command(),
                output.status.code().unwrap_or(1)
            );
        }
        Ok(stdout)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_update_command() {
        let cmd = update_command("npm", &names(&["@acme/a", "@acme/b"]), UpdateMode::default());
        assert_eq!(cmd.format_command(), "npm update @acme/a @acme/b");
    }

    #[test]
    fn test_force_pins_latest() {
        let mode = UpdateMode {
            global: false,
            force: true,
        };
        let cmd = update_command("npm", &names(&["@acme/a", "@acme/b"]), mode);
        assert_eq!(
            cmd.get_args(),
            &["install", "@acme/a@latest", "@acme/b@latest"]
        );
    }

    #[test]
    fn test_global_flag_precedes_packages() {
        let mode = UpdateMode {
            global: true,
            force: false,
        };
        let cmd = update_command("npm", &names(&["@acme/cli"]), mode);
        assert_eq!(cmd.format_command(), "npm update -g @acme/cli");

        let mode = UpdateMode {
            global: true,
            force: true,
        };
        let cmd = update_command("npm", &names(&["@acme/cli"]), mode);
        assert_eq!(cmd.format_command(), "npm install -g @acme/cli@latest");
    }

    #[test]
    fn test_global_list_command() {
        let cmd = global_list_command("pnpm");
        assert_eq!(cmd.program(), "pnpm");
        assert_eq!(cmd.format_command(), "pnpm ls -g --depth=0 --json");
    }

    #[test]
    fn test_system_executor_missing_program() {
        let cmd = NpmCommand::new("scopeup-definitely-not-a-real-program");
        let err = SystemExecutor.output(&cmd).unwrap_err();
        assert!(err.to_string().contains("Failed to run"));
    }

    #[cfg(unix)]
    #[test]
    fn test_listing_keeps_stdout_on_failure() {
        let mut cmd = NpmCommand::new("sh");
        cmd.args(["-c", "echo '{\"dependencies\":{}}'; echo 'npm ERR! extraneous' >&2; exit 1"]);

        assert_eq!(SystemExecutor.listing(&cmd).unwrap(), r#"{"dependencies":{}}"#);
        assert!(SystemExecutor.output(&cmd).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_listing_without_stdout_fails() {
        let mut cmd = NpmCommand::new("sh");
        cmd.args(["-c", "echo 'npm ERR! broken' >&2; exit 1"]);

        let err = SystemExecutor.listing(&cmd).unwrap_err();
        assert!(err.to_string().contains("npm ERR! broken"));
    }
}
