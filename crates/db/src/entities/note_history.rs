//! Note content history entity.

use sea_orm::entity::prelude::*;

/// Content of a note before one edit.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "note_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub note_id: String,

    #[sea_orm(nullable)]
    pub edited_by_id: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub previous_content: String,

    pub edited_at: DateTimeWithTimeZone,
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
        from = "Column::EditedById",
        to = "super::user::Column::Id"
    )]
    EditedBy,
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Note.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EditedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
