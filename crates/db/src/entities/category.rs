//! Category entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(column_type = "Text", default_value = "")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::note_category::Entity")]
    NoteCategorys,
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        super::note_category::Relation::Note.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::note_category::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
