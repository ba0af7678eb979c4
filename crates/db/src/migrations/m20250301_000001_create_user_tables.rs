//! Create user, login history, address and contact tables.

use sea_orm::{ActiveEnum, Iterable};
use sea_orm_migration::prelude::*;

use crate::deletion::fk_action;
use crate::entities::address::State;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(User::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::Password).string_len(128).not_null())
                    .col(ColumnDef::new(User::DateOfBirth).date())
                    .col(
                        ColumnDef::new(User::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(User::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(User::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(User::LastLogin).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LoginHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoginHistory::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LoginHistory::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoginHistory::IpAddress)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoginHistory::UserAgent)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoginHistory::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_login_history_user")
                            .from(LoginHistory::Table, LoginHistory::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("login_history", "user_id")),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, timestamp) for the newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_login_history_user_timestamp")
                    .table(LoginHistory::Table)
                    .col(LoginHistory::UserId)
                    .col(LoginHistory::Timestamp)
                    .to_owned(),
            )
            .await?;

        let states: Vec<String> = State::iter().map(|s| s.to_value()).collect();

        manager
            .create_table(
                Table::create()
                    .table(Address::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Address::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Address::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Address::State)
                            .string_len(2)
                            .not_null()
                            .check(Expr::col(Address::State).is_in(states)),
                    )
                    .col(ColumnDef::new(Address::Street).string_len(100).not_null())
                    .col(ColumnDef::new(Address::Number).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Address::Complement)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Address::Neighborhood)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Address::City).string_len(100).not_null())
                    .col(ColumnDef::new(Address::PostalCode).string_len(9).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_user")
                            .from(Address::Table, Address::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("address", "user_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_address_user_postal_code")
                    .table(Address::Table)
                    .col(Address::UserId)
                    .col(Address::PostalCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contact::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contact::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contact::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Contact::Landline)
                            .string_len(20)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Contact::MobilePhone)
                            .string_len(20)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contact_user")
                            .from(Contact::Table, Contact::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(fk_action("contact", "user_id")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contact_user_id")
                    .table(Contact::Table)
                    .col(Contact::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Contact::Table)
                    .table(Address::Table)
                    .table(LoginHistory::Table)
                    .table(User::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Username,
    Email,
    Password,
    DateOfBirth,
    IsActive,
    IsStaff,
    IsSuperuser,
    LastLogin,
    CreatedAt,
}

#[derive(Iden)]
enum LoginHistory {
    Table,
    Id,
    UserId,
    IpAddress,
    UserAgent,
    Timestamp,
}

#[derive(Iden)]
enum Address {
    Table,
    Id,
    UserId,
    State,
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    PostalCode,
}

#[derive(Iden)]
enum Contact {
    Table,
    Id,
    UserId,
    Landline,
    MobilePhone,
}
