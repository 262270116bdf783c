//! The Pipeline Executor: wires stdin/stdout/stderr across mixed
//! builtin/external stages and waits for the pipeline to finish.
//!
//! Builtins never touch process-global stdio. Single-stage builtins are
//! invoked in-process with explicit writer parameters (spec.md §4.6 case
//! 1); builtins inside a multi-stage pipeline are isolated by re-exec'ing
//! this binary with a hidden `--exec-builtin` argument, matching Design
//! Notes §9's replacement for fork-and-mutate.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::os::unix::io::{FromRawFd, IntoRawFd};
use std::process::{Child, Command, Stdio};

use crate::builtins::{BuiltinContext, BuiltinRegistry};
use crate::config::ShellConfig;
use crate::history::HistoryBuffer;
use crate::parser::{Pipeline, Stage};
use crate::redirection;

pub const EXEC_BUILTIN_FLAG: &str = "--exec-builtin";
pub const STAGE_ERROR_FLAG: &str = "--stage-error";

pub struct Shell {
    pub config: ShellConfig,
    pub registry: BuiltinRegistry,
    pub history: HistoryBuffer,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        let mut history = HistoryBuffer::new();
        if let Some(histfile) = &config.histfile {
            let _ = history.load_from_file(histfile);
            history.mark_all_appended();
        }
        Self { config, registry: BuiltinRegistry::new(), history }
    }

    /// Persists history to `HISTFILE` if one is configured.
    pub fn persist_history(&self) {
        if let Some(histfile) = &self.config.histfile {
            let _ = self.history.write_all(histfile);
        }
    }

    pub fn execute(&mut self, pipeline: &Pipeline) -> i32 {
        if pipeline.stages.len() == 1 {
            let stage = &pipeline.stages[0];
            if self.registry.contains(&stage.argv[0]) {
                self.execute_single_builtin(stage)
            } else {
                self.execute_single_external(stage)
            }
        } else {
            self.execute_multi_stage(&pipeline.stages)
        }
    }

    fn execute_single_builtin(&mut self, stage: &Stage) -> i32 {
        let mut opened = match redirection::open_redirections(&stage.redirections) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("{}", e);
                return 1;
            }
        };

        let name = stage.argv[0].clone();
        let args = stage.argv[1..].to_vec();
        let names = self.registry.names();

        let mut stdin = io::stdin();
        let mut stdout_writer: Box<dyn Write> = take_writer(&mut opened, 1, || Box::new(io::stdout()));
        let mut stderr_writer: Box<dyn Write> = take_writer(&mut opened, 2, || Box::new(io::stderr()));

        let mut ctx = BuiltinContext {
            args: &args,
            stdin: &mut stdin,
            stdout: &mut *stdout_writer,
            stderr: &mut *stderr_writer,
            builtin_names: &names,
            path_list: &self.config.path_list,
            history: &mut self.history,
            histfile: self.config.histfile.as_deref(),
        };

        let builtin = self.registry.get(&name).expect("checked by contains() above");
        builtin.invoke(&mut ctx)
    }

    fn execute_single_external(&mut self, stage: &Stage) -> i32 {
        let name = &stage.argv[0];
        let Some(path) = self.config.path_list.resolve(name) else {
            eprintln!("{}: command not found", name);
            return 127;
        };

        let mut opened = match redirection::open_redirections(&stage.redirections) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("{}", e);
                return 1;
            }
        };

        let stdout = take_stdio(&mut opened, 1, Stdio::inherit);
        let stderr = take_stdio(&mut opened, 2, Stdio::inherit);

        match Command::new(path)
            .args(&stage.argv[1..])
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(stderr)
            .status()
        {
            Ok(status) => status.code().unwrap_or(1),
            Err(e) => {
                eprintln!("{}: {}", name, e);
                126
            }
        }
    }

    fn execute_multi_stage(&mut self, stages: &[Stage]) -> i32 {
        let n = stages.len();
        let mut children: Vec<Child> = Vec::with_capacity(n);
        let mut prev_stdout: Option<std::process::ChildStdout> = None;
        let mut last_status = 0;

        for (i, stage) in stages.iter().enumerate() {
            let is_last = i == n - 1;
            let name = &stage.argv[0];

            let mut opened = match redirection::open_redirections(&stage.redirections) {
                Ok(o) => o,
                Err(e) => {
                    eprintln!("stage {}: {}", i, e);
                    // This stage never launches; drop any input it would
                    // have consumed so its writer sees EOF, not a hang.
                    prev_stdout = None;
                    continue;
                }
            };

            // Kept as sources (not yet-materialized `Stdio`) so a failed
            // spawn attempt can fall back to `spawn_stage_error` with an
            // equivalent set of handles instead of ones already consumed.
            let stdin_source = match prev_stdout.take() {
                Some(out) => StageStdio::Fd(childstdout_into_file(out)),
                None if i == 0 => StageStdio::Inherit,
                None => StageStdio::Null,
            };
            let stdout_source = take_stdio_source(&mut opened, 1, || if is_last { StageStdio::Inherit } else { StageStdio::Piped });
            let stderr_source = take_stdio_source(&mut opened, 2, || StageStdio::Inherit);

            let spawn_result = self.spawn_stage(i, name, stage, &stdin_source, &stdout_source, &stderr_source);

            match spawn_result {
                Ok(mut child) => {
                    prev_stdout = child.stdout.take();
                    children.push(child);
                }
                Err(e) => {
                    eprintln!("stage {}: {}: {}", i, name, e);
                    prev_stdout = None;
                }
            }
        }

        for child in &mut children {
            last_status = match child.wait() {
                Ok(status) => status.code().unwrap_or(1),
                Err(_) => 1,
            };
        }
        last_status
    }

    /// Spawns one pipeline stage, falling back to a `--stage-error`
    /// placeholder (with an equivalent, freshly-cloned set of stdio) if
    /// resolution or the real spawn attempt fails, so the stage's slot in
    /// the pipe graph is still occupied by a real process instead of one
    /// that never launched (spec.md §4.6 failure semantics).
    fn spawn_stage(
        &self,
        index: usize,
        name: &str,
        stage: &Stage,
        stdin: &StageStdio,
        stdout: &StageStdio,
        stderr: &StageStdio,
    ) -> io::Result<Child> {
        if self.registry.contains(name) {
            return self.spawn_builtin_stage(stage, stdin.to_stdio()?, stdout.to_stdio()?, stderr.to_stdio()?);
        }

        let Some(path) = self.config.path_list.resolve(name) else {
            eprintln!("stage {}: {}: command not found", index, name);
            return self.spawn_stage_error(
                &format!("{}: command not found", name),
                127,
                stdin.to_stdio()?,
                stdout.to_stdio()?,
                stderr.to_stdio()?,
            );
        };

        match Command::new(path)
            .args(&stage.argv[1..])
            .stdin(stdin.to_stdio()?)
            .stdout(stdout.to_stdio()?)
            .stderr(stderr.to_stdio()?)
            .spawn()
        {
            Ok(child) => Ok(child),
            Err(e) => {
                eprintln!("stage {}: {}: {}", index, name, e);
                self.spawn_stage_error(&format!("{}: {}", name, e), 126, stdin.to_stdio()?, stdout.to_stdio()?, stderr.to_stdio()?)
            }
        }
    }

    fn spawn_builtin_stage(&self, stage: &Stage, stdin: Stdio, stdout: Stdio, stderr: Stdio) -> io::Result<Child> {
        let exe = std::env::current_exe()?;
        let mut cmd = Command::new(exe);
        cmd.arg(EXEC_BUILTIN_FLAG).args(&stage.argv).stdin(stdin).stdout(stdout).stderr(stderr);
        if let Some(histfile) = &self.config.histfile {
            cmd.env("HISTFILE", histfile);
        }
        cmd.spawn()
    }

    fn spawn_stage_error(&self, message: &str, code: i32, stdin: Stdio, stdout: Stdio, stderr: Stdio) -> io::Result<Child> {
        let exe = std::env::current_exe()?;
        Command::new(exe)
            .arg(STAGE_ERROR_FLAG)
            .arg(message)
            .arg(code.to_string())
            .stdin(stdin)
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
    }
}

fn take_writer(opened: &mut HashMap<u32, File>, fd: u32, default: impl FnOnce() -> Box<dyn Write>) -> Box<dyn Write> {
    match opened.remove(&fd) {
        Some(f) => Box::new(f),
        None => default(),
    }
}

fn take_stdio(opened: &mut HashMap<u32, File>, fd: u32, default: impl FnOnce() -> Stdio) -> Stdio {
    match opened.remove(&fd) {
        Some(f) => Stdio::from(f),
        None => default(),
    }
}

/// A not-yet-materialized stdio source for a multi-stage pipeline slot.
/// Kept instead of a `Stdio` value itself so a failed spawn attempt can
/// retry with an equivalent handle rather than one the first `Command`
/// already consumed.
enum StageStdio {
    Inherit,
    Null,
    Piped,
    Fd(File),
}

impl StageStdio {
    fn to_stdio(&self) -> io::Result<Stdio> {
        Ok(match self {
            StageStdio::Inherit => Stdio::inherit(),
            StageStdio::Null => Stdio::null(),
            StageStdio::Piped => Stdio::piped(),
            StageStdio::Fd(file) => Stdio::from(file.try_clone()?),
        })
    }
}

fn take_stdio_source(opened: &mut HashMap<u32, File>, fd: u32, default: impl FnOnce() -> StageStdio) -> StageStdio {
    match opened.remove(&fd) {
        Some(f) => StageStdio::Fd(f),
        None => default(),
    }
}

/// Reinterprets a previous stage's piped stdout as a plain `File`, the
/// same conversion `Stdio::from(ChildStdout)` performs internally, so it
/// can be cloned again for a retried spawn attempt.
fn childstdout_into_file(out: std::process::ChildStdout) -> File {
    // SAFETY: `ChildStdout` uniquely owns this fd; `into_raw_fd` transfers
    // that ownership and `from_raw_fd` reclaims it with the same lifetime.
    unsafe { File::from_raw_fd(out.into_raw_fd()) }
}

/// Entry point for a re-exec'd builtin running in pipeline isolation
/// (`--exec-builtin <name> [args...]`). Runs with the real process stdio
/// (already wired to the pipeline's pipes by the parent) and exits with
/// the builtin's code; `cd`/`history` mutations here never reach the
/// parent shell, by design (spec.md §5).
pub fn run_exec_builtin(argv: &[String]) -> ! {
    let config = ShellConfig::from_env();
    let registry = BuiltinRegistry::new();
    let mut history = HistoryBuffer::new();
    if let Some(histfile) = &config.histfile {
        let _ = history.load_from_file(histfile);
        history.mark_all_appended();
    }

    let Some(name) = argv.first() else {
        std::process::exit(2);
    };
    let Some(builtin) = registry.get(name) else {
        eprintln!("{}: not a builtin", name);
        std::process::exit(127);
    };

    let args = argv[1..].to_vec();
    let names = registry.names();
    let mut stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut ctx = BuiltinContext {
        args: &args,
        stdin: &mut stdin,
        stdout: &mut stdout,
        stderr: &mut stderr,
        builtin_names: &names,
        path_list: &config.path_list,
        history: &mut history,
        histfile: config.histfile.as_deref(),
    };
    let code = builtin.invoke(&mut ctx);
    std::process::exit(code);
}

/// Entry point for a re-exec'd pipeline-stage-failure placeholder
/// (`--stage-error <message> <code>`): reports a resolve/spawn failure
/// from inside an otherwise-normal pipeline participant so the pipe graph
/// around it stays correctly connected.
pub fn run_stage_error(message: &str, code: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(code.parse().unwrap_or(1));
}
