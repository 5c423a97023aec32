//! Paths addressing a location inside a value tree.
//!
//! A [`Path`] is an ordered, possibly empty list of navigation steps. The
//! engine only requires one step kind -- field-by-name -- but the step enum
//! leaves room for future kinds (sequence index, map key). Building a path
//! performs no validation; paths are resolved lazily when an action runs.

use std::fmt;

/// One navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Descend into the named field of a Record.
    Field(String),
}

/// An ordered sequence of navigation steps. The empty path addresses the
/// root value itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// The empty path -- the root value.
    pub fn root() -> Path {
        Path { steps: Vec::new() }
    }

    /// Builds a path from a list of field names.
    pub fn of<I, S>(names: I) -> Path
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Path {
            steps: names
                .into_iter()
                .map(|n| PathStep::Field(n.into()))
                .collect(),
        }
    }

    /// Extends this path with one more field step.
    pub fn field(mut self, name: impl Into<String>) -> Path {
        self.steps.push(PathStep::Field(name.into()));
        self
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// The field name of the final step, if the final step is a field step.
    pub fn last_field_name(&self) -> Option<&str> {
        match self.steps.last() {
            Some(PathStep::Field(name)) => Some(name),
            None => None,
        }
    }

    /// A new path holding only the first `n` steps.
    pub fn truncated(&self, n: usize) -> Path {
        Path {
            steps: self.steps[..n.min(self.steps.len())].to_vec(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, ".");
        }
        for step in &self.steps {
            match step {
                PathStep::Field(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}
