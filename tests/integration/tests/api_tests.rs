//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL
//!
//! Run with: cargo test -p integration-tests --test api_tests

use forum_core::value_objects::PermAction;
use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

/// Find a node anywhere in a forum tree
fn find_node<'a>(nodes: &'a [ForumNodeData], id: &str) -> Option<&'a ForumNodeData> {
    nodes.iter().find_map(|node| {
        if node.forum.id == id {
            Some(node)
        } else {
            find_node(&node.children, id)
        }
    })
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Forum Tests
// ============================================================================

#[tokio::test]
async fn test_create_forum_requires_admin() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    // No token at all
    let response = server
        .post("/api/v1/forums", &CreateForumBody::root())
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    // Authenticated but not an admin
    let user = seed_user(&server.state, false).await.unwrap();
    let response = server
        .post_auth("/api/v1/forums", &user.token, &CreateForumBody::root())
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_admin_creates_and_lists_forum() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();

    let body = CreateForumBody::root();
    let response = server
        .post_auth("/api/v1/forums", &admin.token, &body)
        .await
        .unwrap();
    let created: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(created.data.name, body.name);
    assert_eq!(created.data.depth, 0);
    assert!(created.data.parent_id.is_none());
    assert_eq!(created.data.topic_count, 0);

    // Admins see everything on the board index
    let response = server.get_auth("/api/v1/forums", &admin.token).await.unwrap();
    let tree: Data<Vec<ForumNodeData>> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(tree.data.iter().any(|n| n.forum.id == created.data.id));
}

#[tokio::test]
async fn test_hidden_forum_reads_as_not_found() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();
    let user = seed_user(&server.state, false).await.unwrap();

    let response = server
        .post_auth("/api/v1/forums", &admin.token, &CreateForumBody::root())
        .await
        .unwrap();
    let forum: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let forum_id = forum.data.id;

    // Without a view grant the forum looks like it does not exist
    let path = format!("/api/v1/forums/{forum_id}");
    let response = server.get_auth(&path, &user.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    // With the grant it appears
    grant_view(&server.state, user.id(), &forum_id).await.unwrap();
    let response = server.get_auth(&path, &user.token).await.unwrap();
    let detail: Data<ForumDetailData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.data.forum.id, forum_id);
}

#[tokio::test]
async fn test_edit_grant_does_not_make_forum_visible() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();
    let user = seed_user(&server.state, false).await.unwrap();

    let response = server
        .post_auth("/api/v1/forums", &admin.token, &CreateForumBody::root())
        .await
        .unwrap();
    let forum: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let forum_id = forum.data.id;

    // An edit grant alone leaves the forum hidden
    grant_forum_perm(&server.state, user.id(), PermAction::Edit, &forum_id)
        .await
        .unwrap();

    let response = server.get_auth("/api/v1/forums", &user.token).await.unwrap();
    let tree: Data<Vec<ForumNodeData>> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(find_node(&tree.data, &forum_id).is_none());

    let path = format!("/api/v1/forums/{forum_id}");
    let response = server.get_auth(&path, &user.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    // A view grant opens it
    grant_view(&server.state, user.id(), &forum_id).await.unwrap();
    let response = server.get_auth("/api/v1/forums", &user.token).await.unwrap();
    let tree: Data<Vec<ForumNodeData>> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(find_node(&tree.data, &forum_id).is_some());
}

#[tokio::test]
async fn test_anonymous_viewer_follows_anonymous_grants() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();
    let anon_id = seed_anonymous_user(&server.state).await.unwrap();

    let response = server
        .post_auth("/api/v1/forums", &admin.token, &CreateForumBody::root())
        .await
        .unwrap();
    let forum: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let forum_id = forum.data.id;

    // Guests have no grant yet
    let response = server.get("/api/v1/forums").await.unwrap();
    let tree: Data<Vec<ForumNodeData>> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!tree.data.iter().any(|n| n.forum.id == forum_id));

    // Granting the anonymous user opens the forum to guests
    grant_view(&server.state, anon_id, &forum_id).await.unwrap();
    let path = format!("/api/v1/forums/{forum_id}");
    let response = server.get(&path).await.unwrap();
    let detail: Data<ForumDetailData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.data.forum.id, forum_id);
}

#[tokio::test]
async fn test_forum_detail_includes_subforum_tree() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();

    let response = server
        .post_auth("/api/v1/forums", &admin.token, &CreateForumBody::root())
        .await
        .unwrap();
    let root: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/forums",
            &admin.token,
            &CreateForumBody::child_of(&root.data.id),
        )
        .await
        .unwrap();
    let child: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(child.data.depth, 1);
    assert_eq!(child.data.parent_id.as_deref(), Some(root.data.id.as_str()));

    let path = format!("/api/v1/forums/{}", root.data.id);
    let response = server.get_auth(&path, &admin.token).await.unwrap();
    let detail: Data<ForumDetailData> = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(detail.data.forum.has_subforums);
    assert!(detail
        .data
        .subforums
        .iter()
        .any(|n| n.forum.id == child.data.id));
}

#[tokio::test]
async fn test_forum_index_includes_depth_three_forums() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();

    // A chain of four forums, depths 0 through 3
    let mut parent_id: Option<String> = None;
    let mut ids = Vec::new();
    for _ in 0..4 {
        let body = match parent_id.as_deref() {
            Some(id) => CreateForumBody::child_of(id),
            None => CreateForumBody::root(),
        };
        let response = server
            .post_auth("/api/v1/forums", &admin.token, &body)
            .await
            .unwrap();
        let forum: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();
        parent_id = Some(forum.data.id.clone());
        ids.push(forum.data.id);
    }

    let response = server.get_auth("/api/v1/forums", &admin.token).await.unwrap();
    let tree: Data<Vec<ForumNodeData>> = assert_json(response, StatusCode::OK).await.unwrap();
    let deepest = find_node(&tree.data, &ids[3]).expect("depth-3 forum missing from index");
    assert_eq!(deepest.forum.depth, 3);
}

#[tokio::test]
async fn test_move_forum_reparents_and_rejects_cycles() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();

    let response = server
        .post_auth("/api/v1/forums", &admin.token, &CreateForumBody::root())
        .await
        .unwrap();
    let a: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth("/api/v1/forums", &admin.token, &CreateForumBody::root())
        .await
        .unwrap();
    let b: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Move b under a
    let path = format!("/api/v1/forums/{}/parent", b.data.id);
    let body = MoveForumBody {
        parent_id: Some(a.data.id.clone()),
    };
    let response = server.patch_auth(&path, &admin.token, &body).await.unwrap();
    let moved: Data<ForumData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(moved.data.parent_id.as_deref(), Some(a.data.id.as_str()));
    assert_eq!(moved.data.depth, 1);

    // Moving a under its own descendant is a cycle
    let path = format!("/api/v1/forums/{}/parent", a.data.id);
    let body = MoveForumBody {
        parent_id: Some(b.data.id.clone()),
    };
    let response = server.patch_auth(&path, &admin.token, &body).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_invalid_forum_id_is_bad_request() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/forums/not-a-number").await.unwrap();
    let error: ErrorData = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_create_forum_validates_name() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();

    let body = CreateForumBody {
        name: String::new(),
        description: "empty name".to_string(),
        parent_id: None,
    };
    let response = server
        .post_auth("/api/v1/forums", &admin.token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Topic & Post Tests
// ============================================================================

#[tokio::test]
async fn test_topic_lifecycle_and_counters() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();
    let user = seed_user(&server.state, false).await.unwrap();

    let response = server
        .post_auth("/api/v1/forums", &admin.token, &CreateForumBody::root())
        .await
        .unwrap();
    let forum: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let forum_id = forum.data.id;
    grant_view(&server.state, user.id(), &forum_id).await.unwrap();

    // Open a topic; the first post is created with it
    let path = format!("/api/v1/forums/{forum_id}/topics");
    let response = server
        .post_auth(&path, &user.token, &CreateTopicBody::unique())
        .await
        .unwrap();
    let topic: Data<TopicData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(topic.data.post_count, 1);
    assert!(topic.data.last_post_id.is_some());

    // Reply
    let path = format!("/api/v1/topics/{}/posts", topic.data.id);
    let body = CreatePostBody {
        message: "A reply".to_string(),
    };
    let response = server.post_auth(&path, &user.token, &body).await.unwrap();
    let post: Data<PostData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(post.data.message, "A reply");
    assert!(!post.data.body_html.is_empty());

    // Topic detail shows both posts and bumps the view counter
    let path = format!("/api/v1/topics/{}", topic.data.id);
    let response = server.get_auth(&path, &user.token).await.unwrap();
    let detail: Data<TopicDetailData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.data.posts.len(), 2);
    assert_eq!(detail.data.topic.post_count, 2);
    assert!(detail.data.topic.views >= 1);

    // The forum counters were propagated
    let path = format!("/api/v1/forums/{forum_id}");
    let response = server.get_auth(&path, &admin.token).await.unwrap();
    let forum: Data<ForumDetailData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(forum.data.forum.topic_count, 1);
    assert_eq!(forum.data.forum.post_count, 2);
    assert_eq!(
        forum.data.forum.last_post_id.as_deref(),
        Some(post.data.id.as_str())
    );
}

#[tokio::test]
async fn test_create_topic_requires_authentication() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();

    let response = server
        .post_auth("/api/v1/forums", &admin.token, &CreateForumBody::root())
        .await
        .unwrap();
    let forum: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();

    let path = format!("/api/v1/forums/{}/topics", forum.data.id);
    let response = server.post(&path, &CreateTopicBody::unique()).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_topic_in_hidden_forum_reads_as_not_found() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = seed_user(&server.state, true).await.unwrap();
    let outsider = seed_user(&server.state, false).await.unwrap();

    let response = server
        .post_auth("/api/v1/forums", &admin.token, &CreateForumBody::root())
        .await
        .unwrap();
    let forum: Data<ForumData> = assert_json(response, StatusCode::CREATED).await.unwrap();

    let path = format!("/api/v1/forums/{}/topics", forum.data.id);
    let response = server
        .post_auth(&path, &admin.token, &CreateTopicBody::unique())
        .await
        .unwrap();
    let topic: Data<TopicData> = assert_json(response, StatusCode::CREATED).await.unwrap();

    let path = format!("/api/v1/topics/{}", topic.data.id);
    let response = server.get_auth(&path, &outsider.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Private Message Tests
// ============================================================================

#[tokio::test]
async fn test_message_flow_with_reply_tree() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server.state, false).await.unwrap();
    let bob = seed_user(&server.state, false).await.unwrap();

    // Alice opens a conversation with Bob
    let body = SendMessageBody::new_conversation(&[bob.username()]);
    let response = server
        .post_auth("/api/v1/messages", &alice.token, &body)
        .await
        .unwrap();
    let sent: Data<MessageData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(sent.data.sender_id, alice.id().to_string());
    assert_eq!(sent.data.depth, 0);

    // Bob finds it unread in his inbox
    let response = server.get_auth("/api/v1/messages/inbox", &bob.token).await.unwrap();
    let inbox: Data<InboxData> = assert_json(response, StatusCode::OK).await.unwrap();
    let delivered = inbox
        .data
        .incoming
        .iter()
        .find(|m| m.message.id == sent.data.id)
        .expect("message not delivered");
    assert!(!delivered.is_read);

    // Bob marks it read
    let path = format!("/api/v1/messages/{}/read", sent.data.id);
    let response = server
        .post_auth(&path, &bob.token, &serde_json::json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth("/api/v1/messages/inbox", &bob.token).await.unwrap();
    let inbox: Data<InboxData> = assert_json(response, StatusCode::OK).await.unwrap();
    let delivered = inbox
        .data
        .incoming
        .iter()
        .find(|m| m.message.id == sent.data.id)
        .unwrap();
    assert!(delivered.is_read);

    // Bob replies; delivery goes back to Alice
    let body = SendMessageBody::reply_to(&sent.data.id);
    let response = server
        .post_auth("/api/v1/messages", &bob.token, &body)
        .await
        .unwrap();
    let reply: Data<MessageData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(reply.data.conversation_id, sent.data.conversation_id);
    assert_eq!(reply.data.parent_id.as_deref(), Some(sent.data.id.as_str()));

    // Alice sees the reply nested under her message
    let path = format!(
        "/api/v1/messages/conversations/{}",
        sent.data.conversation_id
    );
    let response = server.get_auth(&path, &alice.token).await.unwrap();
    let conversation: Data<ConversationData> =
        assert_json(response, StatusCode::OK).await.unwrap();
    let root = conversation
        .data
        .messages
        .iter()
        .find(|n| n.message.id == sent.data.id)
        .expect("root message missing from tree");
    assert!(root.replies.iter().any(|n| n.message.id == reply.data.id));

    // An outsider gets nothing
    let carol = seed_user(&server.state, false).await.unwrap();
    let response = server.get_auth(&path, &carol.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_send_message_requires_real_recipient() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server.state, false).await.unwrap();

    // Sending only to yourself leaves no recipients after filtering
    let body = SendMessageBody::new_conversation(&[alice.username()]);
    let response = server
        .post_auth("/api/v1/messages", &alice.token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_send_message_rejects_unknown_recipient() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server.state, false).await.unwrap();
    let bob = seed_user(&server.state, false).await.unwrap();

    // One real recipient is not enough when another does not resolve
    let ghost = format!("no_such_user_{}", unique_suffix());
    let mut body = SendMessageBody::new_conversation(&[bob.username()]);
    body.recipients.push(ghost.clone());

    let response = server
        .post_auth("/api/v1/messages", &alice.token, &body)
        .await
        .unwrap();
    let error: ErrorData = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "VALIDATION_ERROR");
    assert!(error.error.message.contains(&ghost));
}

#[tokio::test]
async fn test_reply_from_outsider_reads_as_not_found() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server.state, false).await.unwrap();
    let bob = seed_user(&server.state, false).await.unwrap();
    let carol = seed_user(&server.state, false).await.unwrap();

    let body = SendMessageBody::new_conversation(&[bob.username()]);
    let response = server
        .post_auth("/api/v1/messages", &alice.token, &body)
        .await
        .unwrap();
    let sent: Data<MessageData> = assert_json(response, StatusCode::CREATED).await.unwrap();

    let body = SendMessageBody::reply_to(&sent.data.id);
    let response = server
        .post_auth("/api/v1/messages", &carol.token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_inbox_requires_authentication() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/messages/inbox").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}
