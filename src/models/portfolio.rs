use sea_orm::entity::prelude::*;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "gemfolio_portfolios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub url: String,
    pub image: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    /// Stored for moderation; the public listing does not filter on it.
    pub published: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vote::Entity")]
    Vote,
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted from a submission, after validation and image upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPortfolio {
    pub email: String,
    pub name: String,
    pub url: String,
    pub image: String,
}

/// A portfolio as shown in the gallery, with vote metadata for one voter.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct PortfolioView {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub image: String,
    pub created_at: DateTimeWithTimeZone,
    pub votes_count: i32,
    pub is_voted: bool,
}
