//! Create search log, tag, entity, interaction and history tables.

use sea_orm::{ActiveEnum, Iterable};
use sea_orm_migration::prelude::*;

use crate::deletion::fk_action;
use crate::entities::user_interaction::InteractionType;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SearchLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchLog::UserId).string_len(32))
                    .col(ColumnDef::new(SearchLog::Query).string_len(255).not_null())
                    .col(
                        ColumnDef::new(SearchLog::ResultsCount)
                            .integer()
                            .not_null()
                            .check(Expr::col(SearchLog::ResultsCount).gte(0)),
                    )
                    .col(
                        ColumnDef::new(SearchLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_log_user")
                            .from(SearchLog::Table, SearchLog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("search_log", "user_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NoteTag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteTag::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NoteTag::NoteId).string_len(32).not_null())
                    .col(ColumnDef::new(NoteTag::Tag).string_len(100).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_tag_note")
                            .from(NoteTag::Table, NoteTag::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("note_tag", "note_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_note_tag_note_tag")
                    .table(NoteTag::Table)
                    .col(NoteTag::NoteId)
                    .col(NoteTag::Tag)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_tag_tag")
                    .table(NoteTag::Table)
                    .col(NoteTag::Tag)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NoteEntity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteEntity::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NoteEntity::NoteId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(NoteEntity::EntityType)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoteEntity::EntityValue)
                            .string_len(255)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_entity_note")
                            .from(NoteEntity::Table, NoteEntity::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("note_entity", "note_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_entity_entity_type")
                    .table(NoteEntity::Table)
                    .col(NoteEntity::EntityType)
                    .to_owned(),
            )
            .await?;

        let interaction_types: Vec<String> =
            InteractionType::iter().map(|t| t.to_value()).collect();

        manager
            .create_table(
                Table::create()
                    .table(UserInteraction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserInteraction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserInteraction::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserInteraction::NoteId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserInteraction::InteractionType)
                            .string_len(20)
                            .not_null()
                            .check(
                                Expr::col(UserInteraction::InteractionType)
                                    .is_in(interaction_types),
                            ),
                    )
                    .col(ColumnDef::new(UserInteraction::Metadata).json_binary())
                    .col(
                        ColumnDef::new(UserInteraction::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_interaction_user")
                            .from(UserInteraction::Table, UserInteraction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("user_interaction", "user_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_interaction_note")
                            .from(UserInteraction::Table, UserInteraction::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("user_interaction", "note_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_interaction_type")
                    .table(UserInteraction::Table)
                    .col(UserInteraction::InteractionType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NoteHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteHistory::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NoteHistory::NoteId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(NoteHistory::EditedById).string_len(32))
                    .col(
                        ColumnDef::new(NoteHistory::PreviousContent)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoteHistory::EditedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_history_note")
                            .from(NoteHistory::Table, NoteHistory::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("note_history", "note_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_history_edited_by")
                            .from(NoteHistory::Table, NoteHistory::EditedById)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("note_history", "edited_by_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_history_note_edited_at")
                    .table(NoteHistory::Table)
                    .col(NoteHistory::NoteId)
                    .col(NoteHistory::EditedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(NoteHistory::Table)
                    .table(UserInteraction::Table)
                    .table(NoteEntity::Table)
                    .table(NoteTag::Table)
                    .table(SearchLog::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum SearchLog {
    Table,
    Id,
    UserId,
    Query,
    ResultsCount,
    CreatedAt,
}

#[derive(Iden)]
enum NoteTag {
    Table,
    Id,
    NoteId,
    Tag,
}

#[derive(Iden)]
enum NoteEntity {
    Table,
    Id,
    NoteId,
    EntityType,
    EntityValue,
}

#[derive(Iden)]
enum UserInteraction {
    Table,
    Id,
    UserId,
    NoteId,
    InteractionType,
    Metadata,
    Timestamp,
}

#[derive(Iden)]
enum NoteHistory {
    Table,
    Id,
    NoteId,
    EditedById,
    PreviousContent,
    EditedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Note {
    Table,
    Id,
}
