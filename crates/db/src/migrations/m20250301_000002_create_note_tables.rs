//! Create note, category, subject, link, file and sharing tables.

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
                    .table(Note::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Note::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Note::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Note::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Note::Content).text().not_null())
                    .col(
                        ColumnDef::new(Note::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Note::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Note::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_user")
                            .from(Note::Table, Note::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("note", "user_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_note_user_title")
                    .table(Note::Table)
                    .col(Note::UserId)
                    .col(Note::Title)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_note_title", Note::Title),
            ("idx_note_created_at", Note::CreatedAt),
            ("idx_note_updated_at", Note::UpdatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Note::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        for table in [Vocabulary::Category, Vocabulary::Subject] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Vocabulary::Id)
                                .string_len(32)
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Vocabulary::Name)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Vocabulary::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(NoteCategory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteCategory::NoteId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoteCategory::CategoryId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(NoteCategory::NoteId)
                            .col(NoteCategory::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_category_note")
                            .from(NoteCategory::Table, NoteCategory::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("note_category", "note_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_category_category")
                            .from(NoteCategory::Table, NoteCategory::CategoryId)
                            .to(Vocabulary::Category, Vocabulary::Id)
                            .on_delete(fk_action("note_category", "category_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NoteSubject::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteSubject::NoteId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NoteSubject::SubjectId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(NoteSubject::NoteId)
                            .col(NoteSubject::SubjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_subject_note")
                            .from(NoteSubject::Table, NoteSubject::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("note_subject", "note_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_subject_subject")
                            .from(NoteSubject::Table, NoteSubject::SubjectId)
                            .to(Vocabulary::Subject, Vocabulary::Id)
                            .on_delete(fk_action("note_subject", "subject_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(File::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(File::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(File::NoteId).string_len(32).not_null())
                    .col(ColumnDef::new(File::Path).string_len(255).not_null())
                    .col(
                        ColumnDef::new(File::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_note")
                            .from(File::Table, File::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("file", "note_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_note_id")
                    .table(File::Table)
                    .col(File::NoteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sharing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sharing::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sharing::NoteId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Sharing::SharedWithId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sharing::CanEdit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Sharing::SharedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sharing_note")
                            .from(Sharing::Table, Sharing::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("sharing", "note_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sharing_shared_with")
                            .from(Sharing::Table, Sharing::SharedWithId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("sharing", "shared_with_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_sharing_note_shared_with")
                    .table(Sharing::Table)
                    .col(Sharing::NoteId)
                    .col(Sharing::SharedWithId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Sharing::Table)
                    .table(File::Table)
                    .table(NoteSubject::Table)
                    .table(NoteCategory::Table)
                    .table(Vocabulary::Subject)
                    .table(Vocabulary::Category)
                    .table(Note::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Note {
    Table,
    Id,
    UserId,
    Title,
    Content,
    Completed,
    CreatedAt,
    UpdatedAt,
}

/// Category and subject share one shape.
#[derive(Iden)]
enum Vocabulary {
    Category,
    Subject,
    Id,
    Name,
    Description,
}

#[derive(Iden)]
enum NoteCategory {
    Table,
    NoteId,
    CategoryId,
}

#[derive(Iden)]
enum NoteSubject {
    Table,
    NoteId,
    SubjectId,
}

#[derive(Iden)]
enum File {
    Table,
    Id,
    NoteId,
    Path,
    UploadedAt,
}

#[derive(Iden)]
enum Sharing {
    Table,
    Id,
    NoteId,
    SharedWithId,
    CanEdit,
    SharedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
