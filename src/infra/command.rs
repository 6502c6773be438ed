//! # Process Invocation Module / 进程调用模块
//!
//! Every external program zendev starts (the container runtime, the build
//! tool) is described by an [`Invocation`] and launched through an
//! [`Executor`]. The environment overlay and the working directory travel with
//! the invocation, so nothing here mutates the environment of the host process.
//!
//! zendev 启动的每个外部程序（容器运行时、构建工具）都由 [`Invocation`] 描述，
//! 并通过 [`Executor`] 启动。环境变量覆盖和工作目录随调用一起传递，
//! 因此这里不会修改宿主进程的环境变量。

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::infra::fs::ScopedDir;
use crate::infra::t;

/// A fully described external process: program, arguments, the directory to
/// run it in and the variables to add to its environment.
///
/// 一个完整描述的外部进程：程序、参数、运行目录以及需要添加到其环境中的变量。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Directory entered (and left again) around the process.
    /// 进程运行期间进入（并在结束后离开）的目录。
    pub working_dir: Option<PathBuf>,
    /// Variables layered over the inherited environment of the child only.
    /// 仅叠加在子进程继承环境之上的变量。
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn envs(mut self, overlay: BTreeMap<String, String>) -> Self {
        self.env.extend(overlay);
        self
    }

    /// Renders the invocation as a shell-quoted command line for display.
    ///
    /// 将调用渲染为带 shell 引号的命令行以供显示。
    pub fn command_line(&self) -> String {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shlex::try_join(words).unwrap_or_else(|_| {
            // A word with a NUL byte cannot be quoted; fall back to plain joining.
            std::iter::once(self.program.clone())
                .chain(self.args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

/// Output of a process whose streams were captured rather than inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// The seam between the runners and the operating system.
///
/// Implementations block the caller (asynchronously) until the process has
/// exited. There are no timeouts and no retries.
///
/// 运行器与操作系统之间的接缝。
/// 实现会（异步地）阻塞调用方直到进程退出。没有超时，也没有重试。
#[allow(async_fn_in_trait)]
pub trait Executor {
    /// Runs the process with inherited stdio and returns its exit code.
    /// 以继承的标准输入输出运行进程并返回其退出码。
    async fn status(&self, invocation: &Invocation) -> Result<i32>;

    /// Runs the process and captures stdout and stderr separately.
    /// 运行进程并分别捕获 stdout 和 stderr。
    async fn output(&self, invocation: &Invocation) -> Result<CapturedOutput>;
}

/// Executes invocations as real child processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn command(invocation: &Invocation) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&invocation.program);
        cmd.args(&invocation.args).envs(&invocation.env);
        cmd
    }
}

impl Executor for SystemExecutor {
    async fn status(&self, invocation: &Invocation) -> Result<i32> {
        // The child inherits the current directory; the guard puts it back on
        // every exit path, including errors and panics.
        let _scope = match &invocation.working_dir {
            Some(dir) => Some(ScopedDir::enter(dir)?),
            None => None,
        };
        let status = Self::command(invocation)
            .status()
            .await
            .with_context(|| t!("process.spawn_failed", command = invocation.command_line()))?;
        Ok(exit_code(status))
    }

    async fn output(&self, invocation: &Invocation) -> Result<CapturedOutput> {
        let _scope = match &invocation.working_dir {
            Some(dir) => Some(ScopedDir::enter(dir)?),
            None => None,
        };
        let (status, stdout, stderr) = spawn_and_capture(Self::command(invocation)).await;
        let status =
            status.with_context(|| t!("process.spawn_failed", command = invocation.command_line()))?;
        Ok(CapturedOutput {
            code: exit_code(status),
            stdout,
            stderr,
        })
    }
}

/// Maps an exit status to a result code. A process killed by a signal has no
/// code and counts as a failure.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Spawns a command and captures its stdout and stderr.
/// The two streams are drained concurrently so neither pipe can fill up and
/// stall the child.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The captured stdout.
/// - The captured stderr.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 两个输出流被并发读取，因此任何一个管道都不会被填满而阻塞子进程。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<ExitStatus>, String, String) {
    let mut child = match cmd
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new(), String::new()),
    };

    let stdout_handle = child.stdout.take().map(|out| tokio::spawn(read_lines(out)));
    let stderr_handle = child.stderr.take().map(|err| tokio::spawn(read_lines(err)));

    let status = child.wait().await;

    let mut collected = [String::new(), String::new()];
    for (slot, handle) in collected.iter_mut().zip([stdout_handle, stderr_handle]) {
        if let Some(handle) = handle {
            match handle.await {
                Ok(text) => *slot = text,
                Err(e) => eprintln!("{}", t!("process.join_failed", error = e)),
            }
        }
    }
    let [stdout, stderr] = collected;

    (status, stdout, stderr)
}

async fn read_lines<R>(stream: R) -> String
where
    R: AsyncRead + Unpin,
{
    let mut output = String::new();
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        output.push_str(&line);
        output.push('\n');
    }
    output
}
