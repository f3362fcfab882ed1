//! Owner-only guards for post and comment mutations.
//!
//! Guards run after the target record is loaded and before anything is
//! written. Comment deletion is refused outright; every other guard sends the
//! viewer back to the post page.

use crate::domain::{Comment, Post};
use crate::visibility::Viewer;

/// Outcome of a failed ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Send the viewer to the detail page of the given post, without an error.
    RedirectToPost(i64),
    /// Report a permission error.
    Forbidden,
}

/// Editing or deleting a post.
pub fn ensure_post_author(post: &Post, viewer: Viewer) -> Result<(), Denial> {
    if viewer.is(post.author_id) {
        Ok(())
    } else {
        Err(Denial::RedirectToPost(post.id))
    }
}

/// Editing a comment.
pub fn ensure_comment_editor(comment: &Comment, viewer: Viewer) -> Result<(), Denial> {
    if viewer.is(comment.author_id) {
        Ok(())
    } else {
        Err(Denial::RedirectToPost(comment.post_id))
    }
}

/// Deleting a comment.
pub fn ensure_comment_remover(comment: &Comment, viewer: Viewer) -> Result<(), Denial> {
    if viewer.is(comment.author_id) {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostDraft;
    use chrono::Utc;

    fn post_by(author_id: i64) -> Post {
        let mut post = Post::new(
            author_id,
            PostDraft {
                title: "T".into(),
                text: "B".into(),
                pub_date: Utc::now(),
                is_published: true,
                category_id: None,
                location_id: None,
                image: None,
            },
        );
        post.id = 5;
        post
    }

    fn comment_by(author_id: i64) -> Comment {
        let mut comment = Comment::new(5, author_id, "Nice".into());
        comment.id = 40;
        comment
    }

    #[test]
    fn test_post_guard_redirects_non_owner_to_detail() {
        let post = post_by(1);
        assert_eq!(ensure_post_author(&post, Viewer::User(1)), Ok(()));
        assert_eq!(
            ensure_post_author(&post, Viewer::User(2)),
            Err(Denial::RedirectToPost(5))
        );
        assert_eq!(
            ensure_post_author(&post, Viewer::Anonymous),
            Err(Denial::RedirectToPost(5))
        );
    }

    #[test]
    fn test_comment_edit_redirects_but_delete_forbids() {
        let comment = comment_by(1);
        assert_eq!(
            ensure_comment_editor(&comment, Viewer::User(2)),
            Err(Denial::RedirectToPost(5))
        );
        assert_eq!(
            ensure_comment_remover(&comment, Viewer::User(2)),
            Err(Denial::Forbidden)
        );
        assert_eq!(ensure_comment_remover(&comment, Viewer::User(1)), Ok(()));
    }
}
