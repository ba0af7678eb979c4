//! Address service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::address;
use tasknote_db::repositories::AddressRepository;
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::not_found;
use crate::validation::{parse_choice, validate_postal_code, validate_state};

/// Input for creating or replacing an address.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressInput {
    #[validate(custom(function = "validate_state"))]
    pub state: String,

    #[validate(length(min = 1, max = 100))]
    pub street: String,

    #[validate(length(min = 1, max = 20))]
    pub number: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub complement: String,

    #[validate(length(min = 1, max = 100))]
    pub neighborhood: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(custom(function = "validate_postal_code"))]
    pub postal_code: String,
}

/// Partial update of an address.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AddressPatch {
    #[validate(custom(function = "validate_state"))]
    pub state: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub street: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub number: Option<String>,

    #[validate(length(max = 100))]
    pub complement: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub neighborhood: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    #[validate(custom(function = "validate_postal_code"))]
    pub postal_code: Option<String>,
}

impl From<AddressInput> for AddressPatch {
    fn from(input: AddressInput) -> Self {
        Self {
            state: Some(input.state),
            street: Some(input.street),
            number: Some(input.number),
            complement: Some(input.complement),
            neighborhood: Some(input.neighborhood),
            city: Some(input.city),
            postal_code: Some(input.postal_code),
        }
    }
}

/// Service for a user's postal addresses.
#[derive(Clone)]
pub struct AddressService {
    address_repo: AddressRepository,
    id_gen: IdGenerator,
}

impl AddressService {
    /// Create a new address service.
    #[must_use]
    pub const fn new(address_repo: AddressRepository) -> Self {
        Self {
            address_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<address::Model>> {
        self.address_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<address::Model> {
        self.address_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Address"))
    }

    /// Create an address owned by the caller.
    pub async fn create(&self, caller: &Caller, input: AddressInput) -> AppResult<address::Model> {
        input.validate()?;
        let state = parse_choice("state", &input.state)?;

        let model = address::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(caller.user_id.clone()),
            state: Set(state),
            street: Set(input.street),
            number: Set(input.number),
            complement: Set(input.complement),
            neighborhood: Set(input.neighborhood),
            city: Set(input.city),
            postal_code: Set(input.postal_code),
        };

        self.address_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: AddressInput,
    ) -> AppResult<address::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    /// Apply the provided fields to one of the caller's addresses.
    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: AddressPatch,
    ) -> AppResult<address::Model> {
        patch.validate()?;
        let address = self.get(caller, id).await?;

        let mut model: address::ActiveModel = address.into();
        if let Some(state) = patch.state {
            model.state = Set(parse_choice("state", &state)?);
        }
        if let Some(street) = patch.street {
            model.street = Set(street);
        }
        if let Some(number) = patch.number {
            model.number = Set(number);
        }
        if let Some(complement) = patch.complement {
            model.complement = Set(complement);
        }
        if let Some(neighborhood) = patch.neighborhood {
            model.neighborhood = Set(neighborhood);
        }
        if let Some(city) = patch.city {
            model.city = Set(city);
        }
        if let Some(postal_code) = patch.postal_code {
            model.postal_code = Set(postal_code);
        }

        self.address_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let address = self.get(caller, id).await?;
        self.address_repo.delete(&address.id).await
    }
}
