//! Post entity - a single message inside a topic

use chrono::{DateTime, Utc};
use std::net::IpAddr;

use crate::value_objects::Snowflake;

/// Post entity
///
/// The parent topic reference is immutable once created. `body_html` holds
/// an escaped copy of the raw message; markup rendering is out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub topic_id: Snowflake,
    pub author_id: Snowflake,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub updated_by: Option<Snowflake>,
    pub message: String,
    pub body_html: String,
    pub user_ip: Option<IpAddr>,
}

impl Post {
    /// Create a new Post, deriving `body_html` from the raw message
    pub fn new(
        id: Snowflake,
        topic_id: Snowflake,
        author_id: Snowflake,
        message: String,
        user_ip: Option<IpAddr>,
    ) -> Self {
        let body_html = escape_html(&message);
        Self {
            id,
            topic_id,
            author_id,
            created: Utc::now(),
            updated: None,
            updated_by: None,
            message,
            body_html,
            user_ip,
        }
    }
}

/// Minimal HTML escaping for the stored display copy
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(message: &str) -> Post {
        Post::new(
            Snowflake::new(1),
            Snowflake::new(10),
            Snowflake::new(100),
            message.to_string(),
            None,
        )
    }

    #[test]
    fn test_body_html_is_escaped() {
        let p = post("a <b> & \"c\"");
        assert_eq!(p.body_html, "a &lt;b&gt; &amp; &quot;c&quot;");
        assert_eq!(p.message, "a <b> & \"c\"");
    }

    #[test]
    fn test_new_post_starts_unedited() {
        let p = post("original");
        assert!(p.updated.is_none());
        assert!(p.updated_by.is_none());
    }
}
