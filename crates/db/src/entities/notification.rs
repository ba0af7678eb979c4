//! Notification entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub type_id: String,

    /// Recipient.
    pub user_id: String,

    #[sea_orm(nullable)]
    pub note_id: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub sent_at: DateTimeWithTimeZone,

    #[sea_orm(default_value = false)]
    pub read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::notification_type::Entity",
        from = "Column::TypeId",
        to = "super::notification_type::Column::Id"
    )]
    NotificationType,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::note::Entity",
        from = "Column::NoteId",
        to = "super::note::Column::Id"
    )]
    Note,
}

impl Related<super::notification_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotificationType.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Note.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
