//! Canned-response [`ProcessService`]

use async_trait::async_trait;
use interp_platform::{ExecOptions, ProcessError, ProcessOutput, ProcessService};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Response {
    Output(String),
    Exit { code: i32, stderr: String },
}

#[derive(Debug, Clone)]
struct Rule {
    command: String,
    args: Option<Vec<String>>,
    response: Response,
}

/// A recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub command: String,
    pub args: Vec<String>,
}

/// [`ProcessService`] answering from a table of canned responses.
///
/// Rules with explicit arguments win over command-only rules. Commands
/// without a matching rule fail with [`ProcessError::NotFound`], so
/// `StubProcess::new()` behaves like a host where nothing is installed.
#[derive(Debug, Default)]
pub struct StubProcess {
    rules: Vec<Rule>,
    calls: Mutex<Vec<Call>>,
}

impl StubProcess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeed with `stdout` for any invocation of `command`.
    pub fn succeed(mut self, command: &str, stdout: &str) -> Self {
        self.rules.push(Rule {
            command: command.to_string(),
            args: None,
            response: Response::Output(stdout.to_string()),
        });
        self
    }

    /// Succeed with `stdout` when `command` runs with exactly `args`.
    pub fn succeed_with_args(mut self, command: &str, args: &[&str], stdout: &str) -> Self {
        self.rules.push(Rule {
            command: command.to_string(),
            args: Some(args.iter().map(|a| a.to_string()).collect()),
            response: Response::Output(stdout.to_string()),
        });
        self
    }

    /// Exit with `code` for any invocation of `command`.
    pub fn exit(mut self, command: &str, code: i32, stderr: &str) -> Self {
        self.rules.push(Rule {
            command: command.to_string(),
            args: None,
            response: Response::Exit {
                code,
                stderr: stderr.to_string(),
            },
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Invocations whose program was `command`.
    pub fn calls_to(&self, command: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.command == command)
            .collect()
    }

    fn find(&self, command: &str, args: &[String]) -> Option<&Response> {
        self.rules
            .iter()
            .find(|r| r.command == command && r.args.as_deref() == Some(args))
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.command == command && r.args.is_none())
            })
            .map(|r| &r.response)
    }
}

#[async_trait]
impl ProcessService for StubProcess {
    async fn exec(
        &self,
        command: &str,
        args: &[String],
        _options: &ExecOptions,
    ) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(Call {
            command: command.to_string(),
            args: args.to_vec(),
        });

        match self.find(command, args) {
            Some(Response::Output(stdout)) => Ok(ProcessOutput::new(stdout.clone(), "")),
            Some(Response::Exit { code, stderr }) => Err(ProcessError::NonZeroExit {
                command: command.to_string(),
                code: Some(*code),
                stderr: stderr.clone(),
            }),
            None => Err(ProcessError::NotFound {
                command: command.to_string(),
            }),
        }
    }
}
