//! SeaORM entities, one per table.

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;

use blogicum_core::domain::UNSAVED_ID;
use sea_orm::ActiveValue;

/// Unsaved entities leave the key to the database sequence.
pub(crate) fn id_value(id: i64) -> ActiveValue<i64> {
    if id == UNSAVED_ID {
        ActiveValue::NotSet
    } else {
        ActiveValue::Set(id)
    }
}
