//! What happens to referencing rows when a parent row is deleted.
//!
//! Every foreign key in the schema has exactly one entry in [`POLICIES`].
//! Migrations derive their `ON DELETE` actions from it, and repositories
//! call [`guard_delete`] before removing a row that may be protected.

use sea_orm::sea_query::{Alias, Expr, ForeignKeyAction, Query};
use sea_orm::ConnectionTrait;
use tasknote_common::{AppError, AppResult};

use crate::map_db_err;

/// Delete behaviour for one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete the child together with the parent.
    Cascade,
    /// Keep the child and clear the reference.
    SetNull,
    /// Refuse to delete the parent while children exist.
    Protect,
}

impl DeletePolicy {
    /// Foreign key action that enforces this policy in the database.
    #[must_use]
    pub const fn fk_action(self) -> ForeignKeyAction {
        match self {
            Self::Cascade => ForeignKeyAction::Cascade,
            Self::SetNull => ForeignKeyAction::SetNull,
            Self::Protect => ForeignKeyAction::Restrict,
        }
    }
}

/// A foreign key from `child.column` to `parent.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// Referencing table.
    pub child: &'static str,
    /// Foreign key column on `child`.
    pub column: &'static str,
    /// Referenced table.
    pub parent: &'static str,
    pub policy: DeletePolicy,
}

const fn rule(
    child: &'static str,
    column: &'static str,
    parent: &'static str,
    policy: DeletePolicy,
) -> Reference {
    Reference {
        child,
        column,
        parent,
        policy,
    }
}

use DeletePolicy::{Cascade, Protect, SetNull};

/// The deletion-policy table.
pub const POLICIES: &[Reference] = &[
    // user
    rule("login_history", "user_id", "user", Cascade),
    rule("address", "user_id", "user", Cascade),
    rule("contact", "user_id", "user", Cascade),
    rule("note", "user_id", "user", Cascade),
    rule("sharing", "shared_with_id", "user", Cascade),
    rule("notification", "user_id", "user", Cascade),
    rule("review", "reviewer_id", "user", SetNull),
    rule("chat_interaction", "user_id", "user", Cascade),
    rule("note_recommendation", "user_id", "user", Cascade),
    rule("search_log", "user_id", "user", SetNull),
    rule("user_interaction", "user_id", "user", Cascade),
    rule("note_history", "edited_by_id", "user", SetNull),
    // note
    rule("note_category", "note_id", "note", Cascade),
    rule("note_subject", "note_id", "note", Cascade),
    rule("file", "note_id", "note", Cascade),
    rule("sharing", "note_id", "note", Cascade),
    rule("notification", "note_id", "note", Cascade),
    rule("review", "note_id", "note", Cascade),
    rule("note_analysis", "note_id", "note", Cascade),
    rule("note_suggestion", "note_id", "note", Cascade),
    rule("chat_interaction", "note_context_id", "note", SetNull),
    rule("note_recommendation", "recommended_note_id", "note", Cascade),
    rule("note_tag", "note_id", "note", Cascade),
    rule("note_entity", "note_id", "note", Cascade),
    rule("user_interaction", "note_id", "note", Cascade),
    rule("note_history", "note_id", "note", Cascade),
    // vocabularies
    rule("note_category", "category_id", "category", Cascade),
    rule("note_subject", "subject_id", "subject", Cascade),
    rule("notification", "type_id", "notification_type", Protect),
];

/// Look up the rule for `child.column`.
#[must_use]
pub fn policy_for(child: &str, column: &str) -> Option<DeletePolicy> {
    POLICIES
        .iter()
        .find(|r| r.child == child && r.column == column)
        .map(|r| r.policy)
}

/// `ON DELETE` action for a foreign key. Unlisted references are restricted.
#[must_use]
pub fn fk_action(child: &str, column: &str) -> ForeignKeyAction {
    policy_for(child, column).map_or(ForeignKeyAction::Restrict, DeletePolicy::fk_action)
}

/// Every reference pointing at `parent`.
pub fn references_to(parent: &str) -> impl Iterator<Item = &'static Reference> + '_ {
    POLICIES.iter().filter(move |r| r.parent == parent)
}

/// Fail with [`AppError::Protected`] if a protect-rule child still references
/// `parent_table.id = id`.
pub async fn guard_delete<C>(conn: &C, parent_table: &str, id: &str) -> AppResult<()>
where
    C: ConnectionTrait,
{
    for reference in references_to(parent_table).filter(|r| r.policy == Protect) {
        let stmt = Query::select()
            .expr_as(Expr::cust("COUNT(*)"), Alias::new("count"))
            .from(Alias::new(reference.child))
            .and_where(Expr::col(Alias::new(reference.column)).eq(id))
            .to_owned();

        let row = conn
            .query_one(conn.get_database_backend().build(&stmt))
            .await
            .map_err(map_db_err)?;
        let count: i64 = match row {
            Some(row) => row.try_get("", "count").map_err(map_db_err)?,
            None => 0,
        };

        if count > 0 {
            tracing::debug!(
                parent = parent_table,
                child = reference.child,
                count,
                "Delete refused by protect rule"
            );
            return Err(AppError::Protected(format!(
                "Cannot delete {parent_table}: referenced by {count} {} row(s)",
                reference.child
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, EntityName, MockDatabase, Value};

    use super::*;
    use crate::entities::{
        address, category, chat_interaction, contact, file, login_history, note, note_analysis,
        note_category, note_entity, note_history, note_recommendation, note_subject,
        note_suggestion, note_tag, notification, notification_type, review, search_log, sharing,
        subject, user, user_interaction,
    };

    fn table_names() -> HashSet<String> {
        [
            address::Entity.table_name(),
            category::Entity.table_name(),
            chat_interaction::Entity.table_name(),
            contact::Entity.table_name(),
            file::Entity.table_name(),
            login_history::Entity.table_name(),
            note::Entity.table_name(),
            note_analysis::Entity.table_name(),
            note_category::Entity.table_name(),
            note_entity::Entity.table_name(),
            note_history::Entity.table_name(),
            note_recommendation::Entity.table_name(),
            note_subject::Entity.table_name(),
            note_suggestion::Entity.table_name(),
            note_tag::Entity.table_name(),
            notification::Entity.table_name(),
            notification_type::Entity.table_name(),
            review::Entity.table_name(),
            search_log::Entity.table_name(),
            sharing::Entity.table_name(),
            subject::Entity.table_name(),
            user::Entity.table_name(),
            user_interaction::Entity.table_name(),
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    #[test]
    fn test_each_reference_listed_once() {
        let mut seen = HashSet::new();
        for r in POLICIES {
            assert!(seen.insert((r.child, r.column)), "duplicate rule {r:?}");
        }
    }

    #[test]
    fn test_rules_name_real_tables() {
        let tables = table_names();
        for r in POLICIES {
            assert!(tables.contains(r.child), "unknown child {}", r.child);
            assert!(tables.contains(r.parent), "unknown parent {}", r.parent);
        }
    }

    #[test]
    fn test_documented_policies() {
        assert_eq!(policy_for("note", "user_id"), Some(Cascade));
        assert_eq!(policy_for("review", "reviewer_id"), Some(SetNull));
        assert_eq!(policy_for("note_history", "edited_by_id"), Some(SetNull));
        assert_eq!(policy_for("search_log", "user_id"), Some(SetNull));
        assert_eq!(policy_for("chat_interaction", "note_context_id"), Some(SetNull));
        assert_eq!(policy_for("notification", "type_id"), Some(Protect));
        assert!(matches!(fk_action("notification", "type_id"), ForeignKeyAction::Restrict));
        assert!(matches!(fk_action("unknown", "x"), ForeignKeyAction::Restrict));
    }

    #[tokio::test]
    async fn test_guard_delete_refuses_referenced_type() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[btreemap! {
                "count" => Value::BigInt(Some(2))
            }]])
            .into_connection();

        let result = guard_delete(&db, "notification_type", "t1").await;
        assert!(matches!(result, Err(AppError::Protected(_))));
    }

    #[tokio::test]
    async fn test_guard_delete_allows_unreferenced_type() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[btreemap! {
                "count" => Value::BigInt(Some(0))
            }]])
            .into_connection();

        assert!(guard_delete(&db, "notification_type", "t1").await.is_ok());
    }

    #[tokio::test]
    async fn test_guard_delete_without_protect_rules_runs_no_query() {
        // No results appended: any query would fail.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert!(guard_delete(&db, "note", "n1").await.is_ok());
    }
}
