use std::{fmt, future::Future, io, path::PathBuf};

use tokio::process::Command;

const HF_TOKEN_FLAG: &str = "--hf-token=";

/// A fully resolved external invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
}

impl CommandSpec {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg == flag)
    }

    /// Value of a flag passed as two separate arguments (`--flag value`).
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

// Never print the token.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.starts_with(HF_TOKEN_FLAG) {
                write!(f, " {}***", HF_TOKEN_FLAG)?;
            } else if arg.contains(' ') {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandOutcome {
    pub success: bool,
    pub code: Option<i32>,
}

pub trait CommandRunner: Send + Sync + 'static {
    /// Runs the command to completion. `Err` only when it could not be spawned
    /// or awaited; a non-zero exit is reported through the outcome.
    fn run(
        &self,
        command: &CommandSpec,
    ) -> impl Future<Output = io::Result<CommandOutcome>> + Send;
}

pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &CommandSpec) -> io::Result<CommandOutcome> {
        let mut cmd = Command::new(&command.program);
        cmd.current_dir(&command.current_dir)
            .args(&command.args)
            .kill_on_drop(true);

        tracing::info!("will run: {}", command);

        let status = cmd.status().await?;

        Ok(CommandOutcome {
            success: status.success(),
            code: status.code(),
        })
    }
}
