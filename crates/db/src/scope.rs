//! Ownership scoping shared by the repositories.

use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};

use crate::entities::{note, sharing};

/// The authenticated principal a request runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Id of the authenticated user.
    pub user_id: String,
    /// Staff users may see every user and every login history row.
    pub is_staff: bool,
}

impl Caller {
    /// A regular (non-staff) caller.
    #[must_use]
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_staff: false,
        }
    }

    /// A staff caller.
    #[must_use]
    pub fn staff(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_staff: true,
        }
    }
}

/// `SELECT id FROM note WHERE user_id = <caller>`
#[must_use]
pub fn owned_note_ids(caller: &Caller) -> SelectStatement {
    Query::select()
        .column(note::Column::Id)
        .from(note::Entity)
        .and_where(note::Column::UserId.eq(caller.user_id.as_str()))
        .to_owned()
}

/// `SELECT note_id FROM sharing WHERE shared_with_id = <caller>`
#[must_use]
pub fn shared_note_ids(caller: &Caller) -> SelectStatement {
    Query::select()
        .column(sharing::Column::NoteId)
        .from(sharing::Entity)
        .and_where(sharing::Column::SharedWithId.eq(caller.user_id.as_str()))
        .to_owned()
}

/// Restrict a select of a note-child table to rows whose note the caller owns.
pub fn by_note_owner<E, C>(query: Select<E>, column: C, caller: &Caller) -> Select<E>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    query.filter(column.in_subquery(owned_note_ids(caller)))
}
