//! Contact service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::contact;
use tasknote_db::repositories::ContactRepository;
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::not_found;
use crate::validation::{validate_optional_phone, validate_phone};

/// Input for creating or replacing a contact.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactInput {
    /// Optional; blank is allowed.
    #[serde(default)]
    #[validate(length(max = 20), custom(function = "validate_optional_phone"))]
    pub landline: String,

    #[validate(length(max = 20), custom(function = "validate_phone"))]
    pub mobile_phone: String,
}

/// Partial update of a contact.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactPatch {
    #[validate(length(max = 20), custom(function = "validate_optional_phone"))]
    pub landline: Option<String>,

    #[validate(length(max = 20), custom(function = "validate_phone"))]
    pub mobile_phone: Option<String>,
}

impl From<ContactInput> for ContactPatch {
    fn from(input: ContactInput) -> Self {
        Self {
            landline: Some(input.landline),
            mobile_phone: Some(input.mobile_phone),
        }
    }
}

/// Service for a user's phone contacts.
#[derive(Clone)]
pub struct ContactService {
    contact_repo: ContactRepository,
    id_gen: IdGenerator,
}

impl ContactService {
    /// Create a new contact service.
    #[must_use]
    pub const fn new(contact_repo: ContactRepository) -> Self {
        Self {
            contact_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<contact::Model>> {
        self.contact_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<contact::Model> {
        self.contact_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Contact"))
    }

    pub async fn create(&self, caller: &Caller, input: ContactInput) -> AppResult<contact::Model> {
        input.validate()?;

        let model = contact::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(caller.user_id.clone()),
            landline: Set(input.landline),
            mobile_phone: Set(input.mobile_phone),
        };

        self.contact_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: ContactInput,
    ) -> AppResult<contact::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: ContactPatch,
    ) -> AppResult<contact::Model> {
        patch.validate()?;
        let contact = self.get(caller, id).await?;

        let mut model: contact::ActiveModel = contact.into();
        if let Some(landline) = patch.landline {
            model.landline = Set(landline);
        }
        if let Some(mobile_phone) = patch.mobile_phone {
            model.mobile_phone = Set(mobile_phone);
        }

        self.contact_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let contact = self.get(caller, id).await?;
        self.contact_repo.delete(&contact.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[test]
    fn test_phone_rules() {
        let valid = ContactInput {
            landline: String::new(),
            mobile_phone: "11987654321".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_mobile = ContactInput {
            landline: String::new(),
            mobile_phone: "123".to_string(),
        };
        assert!(short_mobile.validate().is_err());

        let short_landline = ContactInput {
            landline: "123".to_string(),
            mobile_phone: "11987654321".to_string(),
        };
        let err = short_landline.validate().unwrap_err();
        assert!(err.field_errors().contains_key("landline"));
    }

    #[test]
    fn test_landline_defaults_to_blank() {
        let input: ContactInput =
            serde_json::from_str(r#"{"mobile_phone": "11987654321"}"#).unwrap();
        assert_eq!(input.landline, "");
        assert!(input.validate().is_ok());
    }

    #[tokio::test]
    async fn test_replace() {
        let stored = contact::Model {
            id: "c1".to_string(),
            user_id: "u1".to_string(),
            landline: String::new(),
            mobile_phone: "11987654321".to_string(),
        };
        let updated = contact::Model {
            landline: "1133334444".to_string(),
            ..stored.clone()
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_query_results([[updated]])
                .into_connection(),
        );
        let service = ContactService::new(ContactRepository::new(db));

        let input = ContactInput {
            landline: "1133334444".to_string(),
            mobile_phone: "11987654321".to_string(),
        };
        let result = service.replace(&Caller::user("u1"), "c1", input).await.unwrap();
        assert_eq!(result.landline, "1133334444");
    }
}
