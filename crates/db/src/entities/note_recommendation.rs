//! Note recommendation entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "note_recommendation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub recommended_note_id: String,

    /// Relevance in `0.0..=1.0`.
    #[sea_orm(column_type = "Double")]
    pub score: f64,

    pub algorithm_version: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::note::Entity",
        from = "Column::RecommendedNoteId",
        to = "super::note::Column::Id"
    )]
    RecommendedNote,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecommendedNote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
