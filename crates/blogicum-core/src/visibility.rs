//! Which posts a viewer is allowed to see.
//!
//! Every listing and the single-post fetch describe their filter with the values
//! in this module. Storage adapters either evaluate [`PostFilter::admits`]
//! directly or translate the same value into a query.

use chrono::{DateTime, Utc};

use crate::domain::{Category, Post};

/// The party looking at a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(i64),
}

impl Viewer {
    pub fn from_user_id(user_id: Option<i64>) -> Self {
        user_id.map_or(Self::Anonymous, Self::User)
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }

    /// True when the viewer is the given user. Anonymous viewers are nobody.
    pub fn is(&self, user_id: i64) -> bool {
        self.user_id() == Some(user_id)
    }
}

/// The visibility gate: the post is published, its category exists and is
/// published, and its publication date has been reached.
pub fn passes_gate(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && category.is_some_and(|c| c.is_published) && post.pub_date <= now
}

/// Visibility rule applied to a set of posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only posts passing the gate.
    Public { now: DateTime<Utc> },
    /// Posts passing the gate, plus everything written by `author_id`.
    PublicOrAuthoredBy { author_id: i64, now: DateTime<Utc> },
    /// Posts flagged as published, ignoring schedule and category.
    Published,
    /// No restriction.
    All,
}

impl Visibility {
    /// Rule for the single-post page: authors preview their own drafts.
    pub fn for_detail(viewer: Viewer, now: DateTime<Utc>) -> Self {
        match viewer {
            Viewer::Anonymous => Self::Public { now },
            Viewer::User(author_id) => Self::PublicOrAuthoredBy { author_id, now },
        }
    }

    /// Rule for a profile page. Owners see everything; other viewers only see
    /// the published flag, with no date or category condition.
    pub fn for_profile(viewer: Viewer, owner_id: i64) -> Self {
        if viewer.is(owner_id) {
            Self::All
        } else {
            Self::Published
        }
    }

    pub fn admits(&self, post: &Post, category: Option<&Category>) -> bool {
        match *self {
            Self::Public { now } => passes_gate(post, category, now),
            Self::PublicOrAuthoredBy { author_id, now } => {
                passes_gate(post, category, now) || post.is_authored_by(author_id)
            }
            Self::Published => post.is_published,
            Self::All => true,
        }
    }
}

/// A listing filter: a visibility rule narrowed to an author or a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFilter {
    pub visibility: Visibility,
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl PostFilter {
    /// Home feed: every post passing the gate.
    pub fn feed(now: DateTime<Utc>) -> Self {
        Self {
            visibility: Visibility::Public { now },
            author_id: None,
            category_id: None,
        }
    }

    /// Category page: posts of one category passing the gate.
    pub fn category(category_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::feed(now)
        }
    }

    /// Profile page of `owner_id` as seen by `viewer`.
    pub fn profile(owner_id: i64, viewer: Viewer) -> Self {
        Self {
            visibility: Visibility::for_profile(viewer, owner_id),
            author_id: Some(owner_id),
            category_id: None,
        }
    }

    pub fn admits(&self, post: &Post, category: Option<&Category>) -> bool {
        self.author_id.is_none_or(|id| post.author_id == id)
            && self.category_id.is_none_or(|id| post.category_id == Some(id))
            && self.visibility.admits(post, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostDraft;
    use chrono::TimeDelta;

    const AUTHOR: i64 = 1;
    const STRANGER: i64 = 2;

    fn category(is_published: bool) -> Category {
        let mut category = Category::new("News".into(), String::new(), "news".into()).unwrap();
        category.id = 10;
        category.is_published = is_published;
        category
    }

    fn post(is_published: bool, pub_date: DateTime<Utc>) -> Post {
        let mut post = Post::new(
            AUTHOR,
            PostDraft {
                title: "Title".into(),
                text: "Text".into(),
                pub_date,
                is_published,
                category_id: Some(10),
                location_id: None,
                image: None,
            },
        );
        post.id = 5;
        post
    }

    #[test]
    fn test_gate_requires_all_three_conditions() {
        let now = Utc::now();
        let past = now - TimeDelta::hours(1);
        let future = now + TimeDelta::hours(1);
        let open = category(true);
        let closed = category(false);

        assert!(passes_gate(&post(true, past), Some(&open), now));
        assert!(passes_gate(&post(true, now), Some(&open), now));
        assert!(!passes_gate(&post(false, past), Some(&open), now));
        assert!(!passes_gate(&post(true, past), Some(&closed), now));
        assert!(!passes_gate(&post(true, future), Some(&open), now));
        assert!(!passes_gate(&post(true, past), None, now));
    }

    #[test]
    fn test_detail_lets_author_preview_hidden_post() {
        let now = Utc::now();
        let scheduled = post(false, now + TimeDelta::days(3));
        let closed = category(false);

        assert!(Visibility::for_detail(Viewer::User(AUTHOR), now).admits(&scheduled, Some(&closed)));
        assert!(
            !Visibility::for_detail(Viewer::User(STRANGER), now).admits(&scheduled, Some(&closed))
        );
        assert!(!Visibility::for_detail(Viewer::Anonymous, now).admits(&scheduled, Some(&closed)));
    }

    #[test]
    fn test_feed_ignores_authorship() {
        let now = Utc::now();
        let hidden = post(false, now - TimeDelta::hours(1));
        assert!(!PostFilter::feed(now).admits(&hidden, Some(&category(true))));
    }

    #[test]
    fn test_profile_rule_is_looser_than_gate() {
        let now = Utc::now();
        let scheduled = post(true, now + TimeDelta::days(1));
        let draft = post(false, now - TimeDelta::days(1));
        let closed = category(false);

        let stranger = PostFilter::profile(AUTHOR, Viewer::User(STRANGER));
        assert!(stranger.admits(&scheduled, Some(&closed)));
        assert!(stranger.admits(&scheduled, None));
        assert!(!stranger.admits(&draft, Some(&closed)));

        let anonymous = PostFilter::profile(AUTHOR, Viewer::Anonymous);
        assert!(!anonymous.admits(&draft, None));

        let owner = PostFilter::profile(AUTHOR, Viewer::User(AUTHOR));
        assert!(owner.admits(&draft, None));
    }

    #[test]
    fn test_profile_filter_is_scoped_to_owner() {
        let now = Utc::now();
        let filter = PostFilter::profile(STRANGER, Viewer::User(STRANGER));
        assert!(!filter.admits(&post(true, now), Some(&category(true))));
    }

    #[test]
    fn test_category_filter_matches_category_id() {
        let now = Utc::now();
        let visible = post(true, now - TimeDelta::minutes(1));
        assert!(PostFilter::category(10, now).admits(&visible, Some(&category(true))));
        assert!(!PostFilter::category(11, now).admits(&visible, Some(&category(true))));
    }
}
