//! Starts a debuggee with its inspector enabled

use crate::error::SnapshotError;
use regex::Regex;
use std::ffi::OsStr;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::LazyLock;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpListener;
use tokio::process::{Child, ChildStderr, Command};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};
use url::Url;

static LISTENING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Debugger listening on (?<url>ws://\S+)$").expect("invalid listening pattern")
});

static INSPECTOR_CHATTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Debugger attached\.|For help, see: .*|Waiting for the debugger to disconnect\.\.\.)$")
        .expect("invalid chatter pattern")
});

/// A running debuggee, stopped before its first statement until a debugger tells it to run.
///
/// The process is killed when this is dropped.
#[derive(Debug)]
pub struct Debuggee {
    child: Child,
    url: Url,
    stderr_task: JoinHandle<()>,
}

impl Debuggee {
    /// Starts `<executable> --inspect-brk=<port> <args...>` on a free local port, and waits for
    /// it to advertise its inspector.
    #[instrument(skip(executable, args), fields(executable = ?executable.as_ref()), err)]
    pub async fn launch<S, I>(executable: S, args: I) -> Result<Self, SnapshotError>
    where
        S: AsRef<OsStr>,
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let port = free_port().await?;
        let mut child = Command::new(executable.as_ref())
            .arg(format!("--inspect-brk={port}"))
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        debug!("spawned debuggee on port {port}");

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("stderr of debuggee is not piped"))?;
        let mut lines = BufReader::new(stderr).lines();
        let url = loop {
            let Some(line) = lines.next_line().await? else {
                return Err(SnapshotError::DebuggeeExited);
            };
            if let Some(captures) = LISTENING_PATTERN.captures(line.trim()) {
                break Url::parse(&captures["url"])?;
            }
            forward_line(&line).await?;
        };
        debug!("inspector listening at {url}");

        let stderr_task = tokio::spawn(forward_stderr(lines));
        Ok(Self {
            child,
            url,
            stderr_task,
        })
    }

    /// The websocket url of the inspector
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Waits for the debuggee to exit
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Kills the debuggee without waiting for it to exit
    pub fn kill(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }
}

impl Drop for Debuggee {
    fn drop(&mut self) {
        self.stderr_task.abort();
    }
}

async fn free_port() -> io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    Ok(listener.local_addr()?.port())
}

/// Passes a line of the debuggee's stderr on, unless the inspector wrote it
async fn forward_line(line: &str) -> io::Result<()> {
    if INSPECTOR_CHATTER_PATTERN.is_match(line.trim()) {
        debug!("debuggee: {line}");
        return Ok(());
    }
    let mut stderr = tokio::io::stderr();
    stderr.write_all(line.as_bytes()).await?;
    stderr.write_all(b"\n").await?;
    stderr.flush().await
}

async fn forward_stderr(mut lines: Lines<BufReader<ChildStderr>>) {
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Err(e) = forward_line(&line).await {
                    debug!("could not forward stderr of debuggee: {e}");
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!("could not read stderr of debuggee: {e}");
                break;
            }
        }
    }
    trace!("stderr of debuggee closed");
}
