//! Address repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{Address, address};
use crate::{Caller, Page, map_db_err};

/// Address repository for database operations.
#[derive(Clone)]
pub struct AddressRepository {
    db: Arc<DatabaseConnection>,
}

impl AddressRepository {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Addresses owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<Address> {
        Address::find()
            .filter(address::Column::UserId.eq(caller.user_id.as_str()))
    }

    /// Find an address by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<address::Model>> {
        Address::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find an address within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<address::Model>> {
        Self::scoped(caller)
            .filter(address::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's addresses, in insertion order.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<address::Model>> {
        let query = Self::scoped(caller).order_by_asc(address::Column::Id);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new address.
    pub async fn create(&self, model: address::ActiveModel) -> AppResult<address::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update an address.
    pub async fn update(&self, model: address::ActiveModel) -> AppResult<address::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete an address.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<Address>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::address::State;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    fn create_test_address(id: &str, user_id: &str, postal_code: &str) -> address::Model {
        address::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            state: State::Sp,
            street: "Rua Augusta".to_string(),
            number: "100".to_string(),
            complement: String::new(),
            neighborhood: "Consolação".to_string(),
            city: "São Paulo".to_string(),
            postal_code: postal_code.to_string(),
        }
    }

    #[test]
    fn test_scope_filters_by_owner() {
        let sql = AddressRepository::scoped(&Caller::user("u1"))
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""address"."user_id" = 'u1'"#));
    }

    #[tokio::test]
    async fn test_find_scoped() {
        let address = create_test_address("a1", "u1", "01000-100");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[address.clone()]])
                .into_connection(),
        );

        let repo = AddressRepository::new(db);
        let result = repo.find_scoped(&Caller::user("u1"), "a1").await.unwrap();

        assert_eq!(result.unwrap().postal_code, "01000-100");
    }

    #[tokio::test]
    async fn test_list_scoped() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_address("a1", "u1", "01000-100"),
                    create_test_address("a2", "u1", "20000-000"),
                ]])
                .into_connection(),
        );

        let repo = AddressRepository::new(db);
        let result = repo
            .list_scoped(&Caller::user("u1"), Page::default())
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }
}
