//! Create review table.

use sea_orm_migration::prelude::*;

use crate::deletion::fk_action;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Review::NoteId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::ReviewerId).string_len(32))
                    .col(
                        ColumnDef::new(Review::Rating)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Review::Rating).between(1, 5)),
                    )
                    .col(
                        ColumnDef::new(Review::Comment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_note")
                            .from(Review::Table, Review::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("review", "note_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_reviewer")
                            .from(Review::Table, Review::ReviewerId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("review", "reviewer_id")),
                    )
                    .to_owned(),
            )
            .await?;

        // NULL reviewers never collide, so orphaned reviews may coexist.
        manager
            .create_index(
                Index::create()
                    .name("uq_review_note_reviewer")
                    .table(Review::Table)
                    .col(Review::NoteId)
                    .col(Review::ReviewerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    NoteId,
    ReviewerId,
    Rating,
    Comment,
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
