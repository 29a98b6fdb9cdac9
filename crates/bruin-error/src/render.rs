//! JSON rendering of an [`Error`] and its parent chain.
//!
//! Rendering is a projection into a borrowed [`Document`] followed by a
//! `serde_json` encode. Each node is projected under its own formatting
//! flags; a child's flags never leak into its parents.
//!
//! The working directory is looked up at most once per render, and only
//! when some node actually renders a non-empty stack.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use bruin_metrics::{FMetric, Metric};
use serde::Serialize;
use serde_json::Value;

use crate::{Error, InternalError, Parent};

/// The canonical shape of one rendered node. Field order is output order;
/// absent or empty fields are left out entirely.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Document<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parents: Vec<Document<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    err_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a BTreeMap<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    metrics: Vec<&'a Metric>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fmetrics: Vec<&'a FMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<Cow<'a, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exit_code: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stack: Vec<String>,
}

type ResolveCwd<'r> = &'r mut dyn FnMut() -> io::Result<PathBuf>;

/// Lazily resolved, cached working directory.
struct WorkingDir<'r> {
    resolve: ResolveCwd<'r>,
    resolved: Option<PathBuf>,
}

impl<'r> WorkingDir<'r> {
    fn new(resolve: ResolveCwd<'r>) -> Self {
        Self {
            resolve,
            resolved: None,
        }
    }

    fn get(&mut self) -> Result<&Path, InternalError> {
        let path = match self.resolved.take() {
            Some(path) => path,
            None => (self.resolve)().map_err(InternalError::WorkingDir)?,
        };
        Ok(self.resolved.insert(path).as_path())
    }
}

impl<'a> Document<'a> {
    fn project(err: &'a Error, cwd: &mut WorkingDir<'_>) -> Result<Self, InternalError> {
        let flags = err.fmt;
        let mut doc = Document {
            id: (!flags.no_id).then(|| err.id.as_str()),
            err_type: err.err_type.as_ref().map(|t| t.as_str()),
            tags: (!err.tags.is_empty()).then_some(&err.tags),
            labels: err.labels.iter().map(String::as_str).collect(),
            metrics: err.metrics.iter().map(|m| &**m).collect(),
            fmetrics: err.fmetrics.iter().map(|m| &**m).collect(),
            msg: if flags.no_msg {
                None
            } else {
                err.msg.as_deref().map(Cow::Borrowed)
            },
            code: err.code,
            exit_code: err.exit_code,
            ..Default::default()
        };

        if !flags.no_parents {
            doc.parents = err
                .parents
                .iter()
                .map(|parent| Document::from_parent(parent, cwd))
                .collect::<Result<_, _>>()?;
        }
        if !flags.no_stack && !err.stack.is_empty() {
            doc.stack = err.stack.render(cwd.get()?);
        }
        Ok(doc)
    }

    fn from_parent(parent: &'a Parent, cwd: &mut WorkingDir<'_>) -> Result<Self, InternalError> {
        match parent {
            Parent::Error(err) => Document::project(err, cwd),
            Parent::Foreign(err) => Ok(Document {
                msg: Some(Cow::Owned(err.to_string())),
                ..Default::default()
            }),
        }
    }
}

impl Error {
    /// Render as JSON, compact unless the pretty flag is set.
    pub fn try_render(&self) -> Result<String, InternalError> {
        self.try_render_in(&mut std::env::current_dir)
    }

    /// Render with stack paths made relative to whatever `resolve` returns.
    pub(crate) fn try_render_in(&self, resolve: ResolveCwd<'_>) -> Result<String, InternalError> {
        let mut cwd = WorkingDir::new(resolve);
        let doc = Document::project(self, &mut cwd)?;
        let json = if self.fmt.pretty {
            serde_json::to_string_pretty(&doc)?
        } else {
            serde_json::to_string(&doc)?
        };
        Ok(json)
    }

    /// Render as JSON.
    ///
    /// # Panics
    ///
    /// If the working directory cannot be read while formatting the stack,
    /// or encoding fails. Use [`Error::try_render`] to handle those faults.
    pub fn render(&self) -> String {
        match self.try_render() {
            Ok(json) => json,
            Err(fault) => {
                #[cfg(feature = "tracing")]
                tracing::error!(target: "bruin_error", id = %self.id, error = %fault, "render failed");
                panic!("{fault}")
            }
        }
    }
}
