//! Out-of-process delegate
//!
//! Spawns one process per lookup with the request as positional arguments.
//! The process must exit 0 and print a single JSON-encoded string.

use crate::config::schema::FetchConfig;
use crate::config::ConfigSource;
use crate::error::{LookupError, LookupResult};
use crate::fetch::{FetchDelegate, OutputRequest, ParameterRequest};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Program plus base arguments
#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn display(&self, extra: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .chain(extra.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Delegate that shells out to an external fetch program
#[derive(Debug, Clone)]
pub struct ProcessDelegate {
    output: Invocation,
    parameter: Invocation,
}

impl ProcessDelegate {
    /// Use explicit commands (program followed by base arguments)
    pub fn new(output_command: &[String], parameter_command: &[String]) -> LookupResult<Self> {
        let output = Invocation::from_command(output_command)
            .ok_or_else(|| LookupError::User("fetch.output_command is empty".to_string()))?;
        let parameter = Invocation::from_command(parameter_command)
            .ok_or_else(|| LookupError::User("fetch.parameter_command is empty".to_string()))?;
        Ok(Self { output, parameter })
    }

    /// Use this binary's own `fetch` subcommand, loading the same config as
    /// the caller
    pub fn current_exe(source: &ConfigSource) -> LookupResult<Self> {
        let exe = std::env::current_exe()
            .map_err(|e| LookupError::io("locating current executable", e))?;
        let program = exe.to_string_lossy().into_owned();

        let subcommand = |kind: &str| {
            let mut args = source.cli_args();
            args.extend(["fetch".to_string(), kind.to_string()]);
            args
        };

        Ok(Self {
            output: Invocation {
                program: program.clone(),
                args: subcommand("output"),
            },
            parameter: Invocation {
                program,
                args: subcommand("parameter"),
            },
        })
    }

    /// Build from config, falling back to the current executable per kind
    pub fn from_config(config: &FetchConfig, source: &ConfigSource) -> LookupResult<Self> {
        let fallback = Self::current_exe(source)?;
        Ok(Self {
            output: Invocation::from_command(&config.output_command).unwrap_or(fallback.output),
            parameter: Invocation::from_command(&config.parameter_command)
                .unwrap_or(fallback.parameter),
        })
    }

    async fn invoke(&self, invocation: &Invocation, extra: &[&str]) -> LookupResult<String> {
        let command = invocation.display(extra);
        debug!("Running fetch delegate: {}", command);

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .args(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| LookupError::command_failed(&command, e))?;

        if !output.status.success() {
            return Err(LookupError::DelegateFailed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_delegate_output(&command, &output.stdout)
    }
}

#[async_trait]
impl FetchDelegate for ProcessDelegate {
    async fn fetch_output(&self, request: &OutputRequest) -> LookupResult<String> {
        self.invoke(&self.output, &request.args()).await
    }

    async fn fetch_parameter(&self, request: &ParameterRequest) -> LookupResult<String> {
        self.invoke(&self.parameter, &request.args()).await
    }

    fn delegate_name(&self) -> &'static str {
        "process"
    }
}

/// Decode the delegate's stdout: one JSON string, surrounding whitespace ignored
fn parse_delegate_output(command: &str, stdout: &[u8]) -> LookupResult<String> {
    let text = std::str::from_utf8(stdout).map_err(|e| LookupError::DelegateOutput {
        command: command.to_string(),
        reason: e.to_string(),
    })?;

    serde_json::from_str::<String>(text.trim()).map_err(|e| LookupError::DelegateOutput {
        command: command.to_string(),
        reason: format!("expected a JSON string: {}", e),
    })
}
