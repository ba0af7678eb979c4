//! Create notification type and notification tables.

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
                    .table(NotificationType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationType::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationType::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationType::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(NotificationType::Template).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Notification::TypeId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notification::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notification::NoteId).string_len(32))
                    .col(ColumnDef::new(Notification::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notification::SentAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Notification::Read)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_type")
                            .from(Notification::Table, Notification::TypeId)
                            .to(NotificationType::Table, NotificationType::Id)
                            .on_delete(fk_action("notification", "type_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_user")
                            .from(Notification::Table, Notification::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("notification", "user_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_note")
                            .from(Notification::Table, Notification::NoteId)
                            .to(Note::Table, Note::Id)
                            .on_delete(fk_action("notification", "note_id")),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, read) for the unread listing
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user_read")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .col(Notification::Read)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_sent_at")
                    .table(Notification::Table)
                    .col(Notification::SentAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Notification::Table)
                    .table(NotificationType::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum NotificationType {
    Table,
    Id,
    Name,
    Description,
    Template,
}

#[derive(Iden)]
enum Notification {
    Table,
    Id,
    TypeId,
    UserId,
    NoteId,
    Message,
    SentAt,
    Read,
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
