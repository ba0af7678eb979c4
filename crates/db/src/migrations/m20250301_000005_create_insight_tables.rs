//! Create note analysis, suggestion, chat interaction and recommendation tables.

use sea_orm::{ActiveEnum, Iterable};
use sea_orm_migration::prelude::*;

use crate::deletion::fk_action;
use crate::entities::note_analysis::Sentiment;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sentiments: Vec<String> = Sentiment::iter().map(|s| s.to_value()).collect();

        manager
            .create_table(
                Table::create()
                    .table(NoteAnalysis::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteAnalysis::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NoteAnalysis::NoteId)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(NoteAnalysis::Summary).text().not_null())
                    .col(
                        ColumnDef::new(NoteAnalysis::Sentiment)
                            .string_len(20)
                            .not_null()
                            .check(Expr::col(NoteAnalysis::Sentiment).is_in(sentiments)),
                    )
                    .col(
                        ColumnDef::new(NoteAnalysis::Keywords)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(NoteAnalysis::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_analysis_note")
                            .from(NoteAnalysis::Table, NoteAnalysis::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("note_analysis", "note_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NoteSuggestion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteSuggestion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NoteSuggestion::NoteId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(NoteSuggestion::Suggestion).text().not_null())
                    .col(
                        ColumnDef::new(NoteSuggestion::Applied)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(NoteSuggestion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_suggestion_note")
                            .from(NoteSuggestion::Table, NoteSuggestion::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("note_suggestion", "note_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChatInteraction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatInteraction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChatInteraction::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChatInteraction::Message).text().not_null())
                    .col(ColumnDef::new(ChatInteraction::Response).text().not_null())
                    .col(
                        ColumnDef::new(ChatInteraction::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ChatInteraction::NoteContextId).string_len(32))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_interaction_user")
                            .from(ChatInteraction::Table, ChatInteraction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("chat_interaction", "user_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_interaction_note_context")
                            .from(ChatInteraction::Table, ChatInteraction::NoteContextId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("chat_interaction", "note_context_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NoteRecommendation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteRecommendation::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NoteRecommendation::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoteRecommendation::RecommendedNoteId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoteRecommendation::Score)
                            .double()
                            .not_null()
                            .check(Expr::col(NoteRecommendation::Score).between(0.0, 1.0)),
                    )
                    .col(
                        ColumnDef::new(NoteRecommendation::AlgorithmVersion)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoteRecommendation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_recommendation_user")
                            .from(NoteRecommendation::Table, NoteRecommendation::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("note_recommendation", "user_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_recommendation_note")
                            .from(
                                NoteRecommendation::Table,
                                NoteRecommendation::RecommendedNoteId,
                            )
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("note_recommendation", "recommended_note_id")),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, score) for the best-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_note_recommendation_user_score")
                    .table(NoteRecommendation::Table)
                    .col(NoteRecommendation::UserId)
                    .col(NoteRecommendation::Score)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(NoteRecommendation::Table)
                    .table(ChatInteraction::Table)
                    .table(NoteSuggestion::Table)
                    .table(NoteAnalysis::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum NoteAnalysis {
    Table,
    Id,
    NoteId,
    Summary,
    Sentiment,
    Keywords,
    CreatedAt,
}

#[derive(Iden)]
enum NoteSuggestion {
    Table,
    Id,
    NoteId,
    Suggestion,
    Applied,
    CreatedAt,
}

#[derive(Iden)]
enum ChatInteraction {
    Table,
    Id,
    UserId,
    Message,
    Response,
    Timestamp,
    NoteContextId,
}

#[derive(Iden)]
enum NoteRecommendation {
    Table,
    Id,
    UserId,
    RecommendedNoteId,
    Score,
    AlgorithmVersion,
    CreatedAt,
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
