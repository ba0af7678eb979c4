//! Postal address entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Brazilian federative units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    #[sea_orm(string_value = "AC")]
    Ac,
    #[sea_orm(string_value = "AL")]
    Al,
    #[sea_orm(string_value = "AP")]
    Ap,
    #[sea_orm(string_value = "AM")]
    Am,
    #[sea_orm(string_value = "BA")]
    Ba,
    #[sea_orm(string_value = "CE")]
    Ce,
    #[sea_orm(string_value = "DF")]
    Df,
    #[sea_orm(string_value = "ES")]
    Es,
    #[sea_orm(string_value = "GO")]
    Go,
    #[sea_orm(string_value = "MA")]
    Ma,
    #[sea_orm(string_value = "MT")]
    Mt,
    #[sea_orm(string_value = "MS")]
    Ms,
    #[sea_orm(string_value = "MG")]
    Mg,
    #[sea_orm(string_value = "PA")]
    Pa,
    #[sea_orm(string_value = "PB")]
    Pb,
    #[sea_orm(string_value = "PR")]
    Pr,
    #[sea_orm(string_value = "PE")]
    Pe,
    #[sea_orm(string_value = "PI")]
    Pi,
    #[sea_orm(string_value = "RJ")]
    Rj,
    #[sea_orm(string_value = "RN")]
    Rn,
    #[sea_orm(string_value = "RS")]
    Rs,
    #[sea_orm(string_value = "RO")]
    Ro,
    #[sea_orm(string_value = "RR")]
    Rr,
    #[sea_orm(string_value = "SC")]
    Sc,
    #[sea_orm(string_value = "SP")]
    Sp,
    #[sea_orm(string_value = "SE")]
    Se,
    #[sea_orm(string_value = "TO")]
    To,
}

impl State {
    /// Full name of the state.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ac => "Acre",
            Self::Al => "Alagoas",
            Self::Ap => "Amapá",
            Self::Am => "Amazonas",
            Self::Ba => "Bahia",
            Self::Ce => "Ceará",
            Self::Df => "Distrito Federal",
            Self::Es => "Espírito Santo",
            Self::Go => "Goiás",
            Self::Ma => "Maranhão",
            Self::Mt => "Mato Grosso",
            Self::Ms => "Mato Grosso do Sul",
            Self::Mg => "Minas Gerais",
            Self::Pa => "Pará",
            Self::Pb => "Paraíba",
            Self::Pr => "Paraná",
            Self::Pe => "Pernambuco",
            Self::Pi => "Piauí",
            Self::Rj => "Rio de Janeiro",
            Self::Rn => "Rio Grande do Norte",
            Self::Rs => "Rio Grande do Sul",
            Self::Ro => "Rondônia",
            Self::Rr => "Roraima",
            Self::Sc => "Santa Catarina",
            Self::Sp => "São Paulo",
            Self::Se => "Sergipe",
            Self::To => "Tocantins",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "address")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub state: State,

    pub street: String,

    pub number: String,

    #[sea_orm(default_value = "")]
    pub complement: String,

    pub neighborhood: String,

    pub city: String,

    /// `NNNNN-NNN` or eight bare digits; unique per user.
    pub postal_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_state_vocabulary() {
        assert_eq!(State::iter().count(), 27);
        assert_eq!(State::Sp.to_value(), "SP");
        assert_eq!(State::Sp.label(), "São Paulo");
        assert_eq!(State::try_from_value(&"DF".to_string()).ok(), Some(State::Df));
        assert!(State::try_from_value(&"XX".to_string()).is_err());
    }
}
