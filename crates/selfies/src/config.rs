//! Configuration of a snapshot session

use crate::error::SnapshotError;
use crate::finder::QueryOptions;
use crate::serializer::SerializeOptions;
use inspector_client::inspector_types::RemoteObject;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// Everything needed to run a script and take snapshots of it
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// The runtime to start, e.g. `node`
    pub executable: OsString,
    /// The arguments passed after the inspector flag, usually the script and its arguments
    pub args: Vec<OsString>,
    pub breakpoints: Vec<BreakpointSpec>,
    pub query: QueryOptions,
    pub serialize: SerializeOptions,
}

impl SessionOptions {
    pub fn new(executable: impl Into<OsString>) -> Self {
        Self {
            executable: executable.into(),
            args: vec![],
            breakpoints: vec![],
            query: QueryOptions::default(),
            serialize: SerializeOptions::default(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Takes a snapshot every time execution reaches `breakpoint`
    pub fn breakpoint(mut self, breakpoint: BreakpointSpec) -> Self {
        self.breakpoints.push(breakpoint);
        self
    }

    /// Captures the instances of the class at `class_path`, see [QueryOptions::include]
    pub fn include(mut self, class_path: impl Into<String>) -> Self {
        self.query = self.query.include(class_path);
        self
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&RemoteObject) -> bool + Send + Sync + 'static,
    {
        self.query = self.query.filter(filter);
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.serialize.max_depth = max_depth;
        self
    }
}

/// A source location, written `file:line` with a 1-based line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointSpec {
    file: PathBuf,
    line: NonZeroU32,
}

impl BreakpointSpec {
    pub fn new(file: impl Into<PathBuf>, line: NonZeroU32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The 1-based line
    pub fn line(&self) -> NonZeroU32 {
        self.line
    }

    /// The 0-based line the runtime expects
    pub fn line_number(&self) -> u32 {
        self.line.get() - 1
    }

    /// The `file://` url of the absolute path of the file
    pub fn url(&self) -> Result<Url, SnapshotError> {
        let path = std::path::absolute(&self.file)?;
        Url::from_file_path(&path).map_err(|()| SnapshotError::InvalidBreakpoint {
            spec: self.to_string(),
            reason: "the file has no file url",
        })
    }
}

impl FromStr for BreakpointSpec {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| SnapshotError::InvalidBreakpoint {
            spec: s.to_string(),
            reason,
        };
        let (file, line) = s.rsplit_once(':').ok_or_else(|| invalid("expected <file>:<line>"))?;
        if file.is_empty() {
            return Err(invalid("the file is missing"));
        }
        let line = line
            .parse::<u32>()
            .map_err(|_| invalid("the line is not a number"))?;
        let line = NonZeroU32::new(line).ok_or_else(|| invalid("lines start at 1"))?;
        Ok(Self::new(file, line))
    }
}

impl Display for BreakpointSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}
