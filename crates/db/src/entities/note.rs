//! Note entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "note")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner. Titles are unique per owner.
    pub user_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    #[sea_orm(default_value = false)]
    pub completed: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::file::Entity")]
    Files,
    #[sea_orm(has_many = "super::note_category::Entity")]
    NoteCategories,
    #[sea_orm(has_many = "super::note_subject::Entity")]
    NoteSubjects,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::note_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::note_category::Relation::Note.def().rev())
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        super::note_subject::Relation::Subject.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::note_subject::Relation::Note.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
