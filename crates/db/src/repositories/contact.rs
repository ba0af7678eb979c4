//! Contact repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{Contact, contact};
use crate::{Caller, Page, map_db_err};

/// Contact repository for database operations.
#[derive(Clone)]
pub struct ContactRepository {
    db: Arc<DatabaseConnection>,
}

impl ContactRepository {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Contacts owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<Contact> {
        Contact::find()
            .filter(contact::Column::UserId.eq(caller.user_id.as_str()))
    }

    /// Find a contact by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<contact::Model>> {
        Contact::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a contact within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<contact::Model>> {
        Self::scoped(caller)
            .filter(contact::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's contacts, in insertion order.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<contact::Model>> {
        let query = Self::scoped(caller).order_by_asc(contact::Column::Id);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new contact.
    pub async fn create(&self, model: contact::ActiveModel) -> AppResult<contact::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a contact.
    pub async fn update(&self, model: contact::ActiveModel) -> AppResult<contact::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a contact.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<Contact>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_scoped_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contact::Model>::new()])
                .into_connection(),
        );

        let repo = ContactRepository::new(db);
        let result = repo.find_scoped(&Caller::user("u2"), "c1").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create() {
        let contact = contact::Model {
            id: "c1".to_string(),
            user_id: "u1".to_string(),
            landline: String::new(),
            mobile_phone: "11987654321".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contact.clone()]])
                .into_connection(),
        );

        let repo = ContactRepository::new(db);
        let created = repo
            .create(contact::ActiveModel::from(contact))
            .await
            .unwrap();

        assert_eq!(created.mobile_phone, "11987654321");
    }
}
