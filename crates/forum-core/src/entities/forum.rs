//! Forum entity - a node in the hierarchical board tree
//!
//! The hierarchy is kept as a materialized path plus a depth column; the
//! aggregate counters (`post_count`, `topic_count`, `last_post_id`) are
//! denormalized caches maintained by the save-time propagation in the
//! database layer, never written from user input.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::value_objects::{Snowflake, TreePath};

/// Forum entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forum {
    pub id: Snowflake,
    pub name: String,
    pub description: String,
    pub parent_id: Option<Snowflake>,
    pub path: TreePath,
    pub depth: i16,
    pub has_subforums: bool,
    pub post_count: i64,
    pub topic_count: i64,
    pub last_post_id: Option<Snowflake>,
    pub updated: DateTime<Utc>,
}

impl Forum {
    /// Create a new root forum
    pub fn new_root(id: Snowflake, name: String, description: String) -> Self {
        Self {
            id,
            name,
            description,
            parent_id: None,
            path: TreePath::root(),
            depth: 0,
            has_subforums: false,
            post_count: 0,
            topic_count: 0,
            last_post_id: None,
            updated: Utc::now(),
        }
    }

    /// Create a new forum under the given parent
    pub fn new_child(id: Snowflake, name: String, description: String, parent: &Forum) -> Self {
        let mut forum = Self::new_root(id, name, description);
        forum.assign_parent(Some(parent));
        forum
    }

    /// Re-encode path and depth from a parent assignment
    ///
    /// Must be called whenever the parent changes; `None` turns the forum
    /// into a root with the canonical empty path.
    pub fn assign_parent(&mut self, parent: Option<&Forum>) {
        match parent {
            Some(parent) => {
                self.parent_id = Some(parent.id);
                self.path = TreePath::child_of(&parent.path, parent.id);
                self.depth = parent.depth + 1;
            }
            None => {
                self.parent_id = None;
                self.path = TreePath::root();
                self.depth = 0;
            }
        }
    }

    /// Check if this forum is a root node
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Prefix matched by the paths of all descendants of this forum
    pub fn subtree_prefix(&self) -> String {
        self.path.subtree_prefix(self.id)
    }
}

/// A forum with its child subtrees, as assembled by [`build_forum_tree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumNode {
    pub forum: Forum,
    pub children: Vec<ForumNode>,
}

/// Assemble a nested tree from a flat list of forums
///
/// `anchor` is the forum the list was queried under: its direct children
/// become the roots of the result. With no anchor, parentless forums are the
/// roots. Forums whose parent is neither the anchor nor present in the list
/// are unreachable (e.g. filtered out by permissions) and are dropped.
pub fn build_forum_tree(anchor: Option<Snowflake>, forums: Vec<Forum>) -> Vec<ForumNode> {
    let mut by_parent: HashMap<Option<Snowflake>, Vec<Forum>> = HashMap::new();
    for forum in forums {
        by_parent.entry(forum.parent_id).or_default().push(forum);
    }

    fn attach(
        parent_key: Option<Snowflake>,
        by_parent: &mut HashMap<Option<Snowflake>, Vec<Forum>>,
    ) -> Vec<ForumNode> {
        let Some(mut level) = by_parent.remove(&parent_key) else {
            return Vec::new();
        };
        level.sort_by_key(|f| f.id);
        level
            .into_iter()
            .map(|forum| {
                let children = attach(Some(forum.id), by_parent);
                ForumNode { forum, children }
            })
            .collect()
    }

    match anchor {
        Some(anchor_id) => attach(Some(anchor_id), &mut by_parent),
        None => attach(None, &mut by_parent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forum(id: i64, parent: Option<&Forum>) -> Forum {
        let mut f = Forum::new_root(Snowflake::new(id), format!("forum-{id}"), String::new());
        f.assign_parent(parent);
        f
    }

    #[test]
    fn test_root_forum_has_empty_path() {
        let root = forum(1, None);
        assert!(root.is_root());
        assert_eq!(root.path.as_str(), "");
        assert_eq!(root.depth, 0);
    }

    #[test]
    fn test_child_encodes_parent_chain() {
        let a = forum(1, None);
        let b = forum(2, Some(&a));
        let c = forum(3, Some(&b));

        assert_eq!(b.path.as_str(), "1.");
        assert_eq!(b.depth, 1);
        assert_eq!(c.path.as_str(), "1.2.");
        assert_eq!(c.depth, 2);
        assert_eq!(c.depth as usize, c.path.ancestor_ids().len());
    }

    #[test]
    fn test_reassigning_parent_reencodes_path() {
        let a = forum(1, None);
        let b = forum(2, None);
        let mut c = forum(3, Some(&a));
        assert_eq!(c.path.as_str(), "1.");

        c.assign_parent(Some(&b));
        assert_eq!(c.path.as_str(), "2.");

        c.assign_parent(None);
        assert!(c.is_root());
        assert_eq!(c.path.as_str(), "");
    }

    #[test]
    fn test_build_tree_from_roots() {
        let a = forum(1, None);
        let b = forum(2, Some(&a));
        let c = forum(3, Some(&b));
        let d = forum(4, None);

        let tree = build_forum_tree(None, vec![c, a.clone(), d, b]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].forum.id, a.id);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].children.len(), 1);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_build_tree_under_anchor() {
        let a = forum(1, None);
        let b = forum(2, Some(&a));
        let c = forum(3, Some(&b));

        // Querying the subtree under `a` returns only b and c
        let tree = build_forum_tree(Some(a.id), vec![b.clone(), c]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].forum.id, b.id);
        assert_eq!(tree[0].children.len(), 1);
    }

    #[test]
    fn test_build_tree_drops_unreachable_forums() {
        let a = forum(1, None);
        let b = forum(2, Some(&a));
        let c = forum(3, Some(&b));

        // b is filtered out (no view permission); c cannot be reached
        let tree = build_forum_tree(None, vec![a.clone(), c]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].forum.id, a.id);
        assert!(tree[0].children.is_empty());
    }
}
