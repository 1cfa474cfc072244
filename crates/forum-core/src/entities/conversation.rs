//! Conversation threading
//!
//! Builds a reply tree from the flat set of messages sharing one
//! conversation id. The set is whatever the viewer is allowed to see, so a
//! reply whose parent is missing from the set is promoted to a root rather
//! than dropped.

use std::collections::HashMap;

use crate::entities::PrivateMessage;
use crate::value_objects::Snowflake;

/// One message with its replies nested beneath it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationNode {
    pub message: PrivateMessage,
    pub replies: Vec<ConversationNode>,
}

/// A threaded view of one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTree {
    pub conversation_id: i64,
    pub roots: Vec<ConversationNode>,
}

impl ConversationTree {
    /// Thread a flat message set into a reply tree
    ///
    /// Messages are attached under their parent when the parent is present;
    /// top-level messages and orphaned replies become roots. Siblings are
    /// ordered by message id, which follows creation order.
    pub fn build(conversation_id: i64, mut messages: Vec<PrivateMessage>) -> Self {
        messages.sort_by_key(|m| m.id);

        let present: HashMap<Snowflake, usize> = messages
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.id, idx))
            .collect();

        let mut children: HashMap<Snowflake, Vec<usize>> = HashMap::new();
        let mut root_indices = Vec::new();
        for (idx, message) in messages.iter().enumerate() {
            match message.parent_id.filter(|p| present.contains_key(p)) {
                Some(parent_id) => children.entry(parent_id).or_default().push(idx),
                None => root_indices.push(idx),
            }
        }

        let mut nodes: Vec<Option<PrivateMessage>> = messages.into_iter().map(Some).collect();
        let roots = root_indices
            .into_iter()
            .map(|idx| Self::collect(idx, &mut nodes, &children))
            .collect();

        Self {
            conversation_id,
            roots,
        }
    }

    fn collect(
        idx: usize,
        nodes: &mut Vec<Option<PrivateMessage>>,
        children: &HashMap<Snowflake, Vec<usize>>,
    ) -> ConversationNode {
        let message = nodes[idx].take().unwrap_or_else(|| unreachable!());
        let replies = children
            .get(&message.id)
            .map(|kids| {
                kids.iter()
                    .map(|&kid| Self::collect(kid, nodes, children))
                    .collect()
            })
            .unwrap_or_default();
        ConversationNode { message, replies }
    }

    /// Total number of messages in the tree
    pub fn len(&self) -> usize {
        fn count(node: &ConversationNode) -> usize {
            1 + node.replies.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: i64, parent: Option<i64>) -> PrivateMessage {
        PrivateMessage {
            id: Snowflake::new(id),
            sender_id: Snowflake::new(1),
            conversation_id: 42,
            parent_id: parent.map(Snowflake::new),
            depth: 0,
            subject: "s".to_string(),
            message: "m".to_string(),
            created: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_build_nests_replies_under_parent() {
        let tree = ConversationTree::build(42, vec![msg(1, None), msg(2, Some(1)), msg(3, Some(1))]);

        assert_eq!(tree.roots.len(), 1);
        let root = &tree.roots[0];
        assert_eq!(root.message.id, Snowflake::new(1));
        assert_eq!(root.replies.len(), 2);
        assert_eq!(root.replies[0].message.id, Snowflake::new(2));
        assert_eq!(root.replies[1].message.id, Snowflake::new(3));
    }

    #[test]
    fn test_build_handles_deep_chains() {
        let tree = ConversationTree::build(42, vec![msg(3, Some(2)), msg(1, None), msg(2, Some(1))]);

        assert_eq!(tree.roots.len(), 1);
        let chain = &tree.roots[0].replies[0].replies[0];
        assert_eq!(chain.message.id, Snowflake::new(3));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_orphaned_reply_becomes_root() {
        // Parent 5 is not visible to the viewer
        let tree = ConversationTree::build(42, vec![msg(1, None), msg(7, Some(5))]);

        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.roots[1].message.id, Snowflake::new(7));
        assert!(tree.roots[1].replies.is_empty());
    }

    #[test]
    fn test_empty_set_yields_empty_tree() {
        let tree = ConversationTree::build(42, Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }
}
