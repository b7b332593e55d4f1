//! Comment thread assembly
//!
//! Comments are stored flat with a self-referential parent id. The thread
//! is materialized from a single bulk fetch: rows are grouped by parent id
//! into an index, then the tree is built from the index. No per-node
//! queries are issued.

use crate::db::models::{Comment, User, UserRole};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Author info nested under a single `author` key on every comment
#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.user_role(),
        }
    }
}

/// A comment with its author, like count, and nested replies
#[derive(Debug, Serialize)]
pub struct CommentNode {
    pub id: Uuid,
    pub content: String,
    pub author: Option<AuthorSummary>,
    pub parent_id: Option<Uuid>,
    pub like_count: u64,
    pub created_at: DateTimeWithTimeZone,
    pub replies: Vec<CommentNode>,
}

/// Build the reply tree for one idea's comments.
///
/// Input order is irrelevant; siblings are ordered oldest-first at every
/// level. A parent id that does not resolve within the row set (the parent
/// was removed out-of-band) demotes the reply to top level rather than
/// dropping it.
pub fn build_thread(rows: Vec<(Comment, Option<User>, u64)>) -> Vec<CommentNode> {
    let known: HashSet<Uuid> = rows.iter().map(|(comment, _, _)| comment.id).collect();

    // parent id -> direct children, replies not yet attached
    let mut index: HashMap<Option<Uuid>, Vec<CommentNode>> = HashMap::new();

    for (comment, author, like_count) in rows {
        let parent = comment.parent_id.filter(|p| known.contains(p));
        index.entry(parent).or_default().push(CommentNode {
            id: comment.id,
            content: comment.content,
            author: author.as_ref().map(AuthorSummary::from),
            parent_id: comment.parent_id,
            like_count,
            created_at: comment.created_at,
            replies: Vec::new(),
        });
    }

    attach_replies(&mut index, None)
}

fn attach_replies(
    index: &mut HashMap<Option<Uuid>, Vec<CommentNode>>,
    parent: Option<Uuid>,
) -> Vec<CommentNode> {
    let mut nodes = index.remove(&parent).unwrap_or_default();
    nodes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    for node in &mut nodes {
        node.replies = attach_replies(index, Some(node.id));
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.org", name),
            password_hash: "unused".to_string(),
            role: "innovator".to_string(),
            phone: None,
            city: None,
            country: None,
            institution: None,
            highest_education: None,
            usage_note: None,
            created_at: Utc::now().into(),
        }
    }

    fn comment(idea: Uuid, parent: Option<Uuid>, content: &str, offset_secs: i64) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            idea_id: idea,
            author_id: Uuid::new_v4(),
            parent_id: parent,
            content: content.to_string(),
            created_at: (Utc::now() + Duration::seconds(offset_secs)).into(),
        }
    }

    #[test]
    fn test_flat_comments_ordered_oldest_first() {
        let idea = Uuid::new_v4();
        let a = comment(idea, None, "second", 10);
        let b = comment(idea, None, "first", 0);
        let c = comment(idea, None, "third", 20);

        let thread = build_thread(vec![
            (a, None, 0),
            (b, None, 0),
            (c, None, 0),
        ]);

        let contents: Vec<_> = thread.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_replies_nested_under_parent_regardless_of_insertion_order() {
        let idea = Uuid::new_v4();
        let root = comment(idea, None, "root", 0);
        let reply = comment(idea, Some(root.id), "reply", 10);
        let nested = comment(idea, Some(reply.id), "nested", 20);

        // Deepest row first; assembly must not depend on fetch order.
        let thread = build_thread(vec![
            (nested.clone(), None, 0),
            (root.clone(), None, 0),
            (reply.clone(), None, 0),
        ]);

        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].id, root.id);
        assert_eq!(thread[0].replies.len(), 1);
        assert_eq!(thread[0].replies[0].id, reply.id);
        assert_eq!(thread[0].replies[0].replies.len(), 1);
        assert_eq!(thread[0].replies[0].replies[0].id, nested.id);
    }

    #[test]
    fn test_sibling_replies_ordered_within_parent() {
        let idea = Uuid::new_v4();
        let root = comment(idea, None, "root", 0);
        let late = comment(idea, Some(root.id), "late", 30);
        let early = comment(idea, Some(root.id), "early", 10);

        let thread = build_thread(vec![
            (late, None, 0),
            (root.clone(), None, 0),
            (early, None, 0),
        ]);

        let replies: Vec<_> = thread[0].replies.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(replies, vec!["early", "late"]);
    }

    #[test]
    fn test_unresolvable_parent_demoted_to_top_level() {
        let idea = Uuid::new_v4();
        let orphan = comment(idea, Some(Uuid::new_v4()), "orphan", 0);

        let thread = build_thread(vec![(orphan.clone(), None, 3)]);

        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].id, orphan.id);
        assert_eq!(thread[0].like_count, 3);
        assert!(thread[0].replies.is_empty());
    }

    #[test]
    fn test_author_summary_attached() {
        let idea = Uuid::new_v4();
        let author = user("ada");
        let c = comment(idea, None, "hello", 0);

        let thread = build_thread(vec![(c, Some(author.clone()), 1)]);

        let summary = thread[0].author.as_ref().unwrap();
        assert_eq!(summary.id, author.id);
        assert_eq!(summary.name, "ada");
        assert_eq!(summary.role, UserRole::Innovator);
    }

    #[test]
    fn test_empty_input_yields_empty_thread() {
        assert!(build_thread(Vec::new()).is_empty());
    }
}
