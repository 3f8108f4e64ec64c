use crate::error::AppResult;
use crate::middleware::VoterIp;
use crate::models::PortfolioView;
use crate::response::ApiResponse;
use crate::services::ranking::{RankingService, SortKey};
use crate::services::repository::DynRepository;
use axum::{extract::Query, response::IntoResponse, Extension};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PortfolioListQuery {
    /// `latest` for newest first; anything else ranks by votes
    pub sort: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PortfolioResponse {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    /// Public image URL
    pub image: String,
    pub created_at: String,
    pub votes_count: i32,
    /// Whether the requesting client has voted for it
    pub is_voted: bool,
}

impl From<PortfolioView> for PortfolioResponse {
    fn from(p: PortfolioView) -> Self {
        Self {
            id: p.id,
            name: p.name,
            url: p.url,
            image: p.image,
            created_at: p.created_at.to_rfc3339(),
            votes_count: p.votes_count,
            is_voted: p.is_voted,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/portfolios",
    params(PortfolioListQuery),
    responses(
        (status = 200, description = "All portfolios with vote metadata", body = Vec<PortfolioResponse>),
    ),
    tag = "portfolios"
)]
pub async fn list_portfolios(
    Extension(repo): Extension<DynRepository>,
    voter: VoterIp,
    Query(query): Query<PortfolioListQuery>,
) -> AppResult<impl IntoResponse> {
    let sort = SortKey::parse(query.sort.as_deref());
    let portfolios = RankingService::new(repo).list(voter.as_str(), sort).await?;
    let items: Vec<PortfolioResponse> = portfolios.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(items))
}
