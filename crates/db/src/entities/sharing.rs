//! Note sharing entity.

use sea_orm::entity::prelude::*;

/// Grants another user access to a note.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sharing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub note_id: String,

    /// Recipient of the share.
    pub shared_with_id: String,

    #[sea_orm(default_value = false)]
    pub can_edit: bool,

    pub shared_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::note::Entity",
        from = "Column::NoteId",
        to = "super::note::Column::Id"
    )]
    Note,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SharedWithId",
        to = "super::user::Column::Id"
    )]
    SharedWith,
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Note.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SharedWith.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
