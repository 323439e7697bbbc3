//! Node scripts and a launcher for testing against a live inspector

use regex::Regex;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, Command};
use url::Url;

static LISTENING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Debugger listening on (?<url>ws://\S+)$").unwrap()
});

/// The node executable tests run, `$SELFIES_NODE` or `node`
pub fn node() -> OsString {
    std::env::var_os("SELFIES_NODE").unwrap_or_else(|| OsString::from("node"))
}

/// Checks whether node can be started at all
pub fn node_available() -> bool {
    std::process::Command::new(node())
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// The path of a script in the fixtures directory
pub fn fixture(name: impl AsRef<Path>) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// A running node instance, paused before its first statement
#[derive(Debug)]
pub struct NodeInstance {
    url: Url,
    child: Child,
    stderr: Lines<BufReader<ChildStderr>>,
}

impl NodeInstance {
    /// Starts a fixture with the inspector on a port picked by node
    pub async fn new(script: impl AsRef<Path>) -> io::Result<Self> {
        let path = fixture(script);
        let mut child = Command::new(node())
            .arg("--inspect-brk=0")
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stderr = BufReader::new(child.stderr.take().expect("no stderr")).lines();
        let url = loop {
            let Some(line) = stderr.next_line().await? else {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "node exited before its inspector started",
                ));
            };
            tracing::debug!("node: {line}");
            if let Some(captures) = LISTENING_PATTERN.captures(line.trim()) {
                break Url::parse(&captures["url"]).map_err(io::Error::other)?;
            }
        };

        Ok(Self { url, child, stderr })
    }

    /// The websocket url of the inspector
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Reads the next line node writes to stderr
    pub async fn next_stderr_line(&mut self) -> io::Result<Option<String>> {
        self.stderr.next_line().await
    }
}

impl Drop for NodeInstance {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
    }
}
