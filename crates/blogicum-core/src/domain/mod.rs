//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use location::Location;
pub use post::{Post, PostDraft, PostSummary};
pub use user::{ProfileChanges, User};

/// Upper bound for titles and names, shared by every entity.
pub const MAX_LENGTH: usize = 256;

/// Identifier carried by entities that have not been stored yet.
pub const UNSAVED_ID: i64 = 0;
