//! Call-site capture for error stacks.
//!
//! The logical construction site comes from `#[track_caller]`, which is exact
//! even when the constructor is reached through several library layers. The
//! frames outward from that site come from a resolved [`backtrace::Backtrace`]:
//! the walk starts at the innermost frame matching the site, so every frame
//! belonging to the library (and to `backtrace` itself) is dropped.
//!
//! Without debug info nothing matches, and the stack degrades to the single
//! call-site frame.

use std::panic::Location;
use std::path::{Path, PathBuf};

/// One call-site location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    file: PathBuf,
    line: u32,
}

impl Frame {
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// `Location::file()` is relative to the workspace root while debug info
    /// usually carries absolute paths, so compare by path suffix.
    fn is_site(&self, site: &Frame) -> bool {
        self.line == site.line && self.file.ends_with(&site.file)
    }

    /// `<file relative to cwd>:<line>`; files outside `cwd` keep their path.
    pub(crate) fn render(&self, cwd: &Path) -> String {
        let file = self.file.strip_prefix(cwd).unwrap_or(&self.file);
        format!("{}:{}", file.display(), self.line)
    }
}

impl From<&Location<'_>> for Frame {
    fn from(loc: &Location<'_>) -> Self {
        Self::new(loc.file(), loc.line())
    }
}

/// Ordered frames, innermost (the construction site) first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack(Vec<Frame>);

impl Stack {
    /// Capture the stack of whoever called this function.
    #[track_caller]
    pub fn capture() -> Self {
        Self::capture_from(Location::caller())
    }

    /// Capture the current stack, trimmed so it starts at `site`.
    pub fn capture_from(site: &Location<'_>) -> Self {
        let origin = Frame::from(site);
        let trace = backtrace::Backtrace::new();
        let resolved: Vec<Frame> = trace
            .frames()
            .iter()
            .flat_map(|frame| frame.symbols())
            .filter_map(|sym| Some(Frame::new(sym.filename()?, sym.lineno()?)))
            .collect();

        match resolved.iter().position(|frame| frame.is_site(&origin)) {
            Some(start) => Self(resolved[start..].to_vec()),
            None => Self(vec![origin]),
        }
    }

    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self(frames)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render every frame relative to `cwd`.
    pub(crate) fn render(&self, cwd: &Path) -> Vec<String> {
        self.0.iter().map(|frame| frame.render(cwd)).collect()
    }
}

impl FromIterator<Frame> for Stack {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
