//! Materialized tree path - dot-terminated ancestor-id chain for forum nodes
//!
//! A forum's path lists the ids of its ancestors from root to parent, each
//! followed by a dot: forum 9 under forum 4 under root forum 1 has path
//! `"1.4."`. Root forums store the canonical empty string, never NULL, so
//! prefix matching stays well-defined. The number of segments always equals
//! the node's depth.

use serde::Serialize;
use std::fmt;

use super::Snowflake;

/// Materialized path of a forum node (ancestor ids, excluding the node itself)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct TreePath(String);

impl TreePath {
    /// The empty path of a root forum
    #[inline]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse a stored path, validating the `"id.id."` shape
    pub fn parse(raw: &str) -> Result<Self, TreePathError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        if !raw.ends_with('.') {
            return Err(TreePathError::MissingTerminator);
        }
        for segment in raw[..raw.len() - 1].split('.') {
            if segment.is_empty() || segment.parse::<i64>().is_err() {
                return Err(TreePathError::InvalidSegment(segment.to_string()));
            }
        }
        Ok(Self(raw.to_string()))
    }

    /// Path of a child node: the parent's path extended by the parent's id
    pub fn child_of(parent_path: &TreePath, parent_id: Snowflake) -> Self {
        Self(format!("{}{}.", parent_path.0, parent_id))
    }

    /// The stored string form
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for root forums (no ancestors)
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of ancestors encoded in the path
    ///
    /// Equals the node's depth; each segment is terminated by exactly one dot.
    pub fn depth(&self) -> i16 {
        self.0.bytes().filter(|b| *b == b'.').count() as i16
    }

    /// Ancestor ids in root-to-parent order
    pub fn ancestor_ids(&self) -> Vec<Snowflake> {
        self.0
            .split('.')
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<i64>().ok().map(Snowflake::new))
            .collect()
    }

    /// Prefix identifying the subtree rooted at the node with this path
    /// and the given id
    ///
    /// The trailing dot is the segment anchor: the prefix of forum 12 is
    /// `"...12."`, which never matches a descendant of forum 120.
    pub fn subtree_prefix(&self, id: Snowflake) -> String {
        format!("{}{}.", self.0, id)
    }

    /// Whether this path lies inside the subtree identified by `prefix`
    #[inline]
    pub fn is_within(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TreePath> for String {
    fn from(path: TreePath) -> Self {
        path.0
    }
}

/// Error when parsing a stored tree path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreePathError {
    #[error("tree path is not dot-terminated")]
    MissingTerminator,
    #[error("invalid tree path segment: {0:?}")]
    InvalidSegment(String),
}
