use crate::error::*;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// A program and its positional arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Parse `["make", "all"]` style command lists.
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(args.iter().fold(Invocation::new(program), |i, a| i.arg(a)))
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// What came back from one process.
#[derive(Clone, Debug, PartialEq)]
pub struct InvocationResult {
    pub success: bool,

    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,

    pub stdout: String,
    pub stderr: String,

    /// Wall clock time from spawn to exit.
    pub elapsed: Duration,
}

impl InvocationResult {
    /// Stand-in for a process that could not be launched at all.
    pub fn not_started(error: &Error) -> Self {
        InvocationResult {
            success: false,
            exit_code: None,
            stdout: String::new(),
            stderr: error.to_string(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn status_label(&self) -> String {
        status_label(self.exit_code)
    }
}

/// Runs invocations and reports how they went.
/// Implemented for closures so tests can stand in for the real binary.
pub trait Launcher {
    fn launch(&mut self, invocation: &Invocation) -> Result<InvocationResult>;
}

impl<F> Launcher for F
where
    F: FnMut(&Invocation) -> Result<InvocationResult>,
{
    fn launch(&mut self, invocation: &Invocation) -> Result<InvocationResult> {
        self(invocation)
    }
}

/// Launches real child processes and blocks until they exit.
#[derive(Copy, Clone, Debug, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, invocation: &Invocation) -> Result<InvocationResult> {
        profiling::scope!("launch");
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let start = Instant::now();
        let output = command.output().map_err(|source| Error::Launch {
            program: invocation.program.clone(),
            source,
        })?;
        let elapsed = start.elapsed();

        Ok(InvocationResult {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed,
        })
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn command_line() {
        let command = vec!["make".to_string(), "all".to_string()];
        let invocation = Invocation::from_command_line(&command).unwrap();
        assert_eq!(invocation.program, PathBuf::from("make"));
        assert_eq!(invocation.args, vec![OsString::from("all")]);
        assert_eq!(invocation.to_string(), "make all");
        assert!(Invocation::from_command_line(&[]).is_none());
    }

    #[test]
    fn closure_launcher() {
        let mut calls = 0;
        let mut launcher = |i: &Invocation| -> Result<InvocationResult> {
            calls += 1;
            Ok(InvocationResult {
                success: false,
                exit_code: Some(i.args.len() as i32),
                stdout: String::new(),
                stderr: String::new(),
                elapsed: Duration::ZERO,
            })
        };
        let result = launcher
            .launch(&Invocation::new("conv").arg("a").arg("b"))
            .unwrap();
        assert_eq!(result.exit_code, Some(2));
        assert_eq!(result.status_label(), "exit code 2");
        assert_eq!(calls, 1);
    }

    #[test]
    fn missing_program() {
        let result = ProcessLauncher
            .launch(&Invocation::new("/definitely/not/a/real/binary"));
        assert!(matches!(result, Err(Error::Launch { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn captures_output_and_status() {
        let result = ProcessLauncher
            .launch(
                &Invocation::new("sh")
                    .arg("-c")
                    .arg("echo out; echo err >&2; exit 3"),
            )
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stdout.trim(), "out");
        assert_eq!(result.stderr.trim(), "err");
    }
}
