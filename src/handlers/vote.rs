use crate::error::AppResult;
use crate::handlers::gallery::parse_portfolio_id;
use crate::middleware::VoterIp;
use crate::response::ApiResponse;
use crate::services::repository::DynRepository;
use crate::services::vote::VoteService;
use axum::{extract::Path, response::IntoResponse, Extension};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteToggleResponse {
    pub portfolio_id: Uuid,
    /// Whether the client now has a vote on the portfolio
    pub voted: bool,
}

#[utoipa::path(
    post,
    path = "/api/v1/portfolios/{id}/vote",
    params(("id" = String, Path, description = "Portfolio ID")),
    responses(
        (status = 200, description = "Vote toggled", body = VoteToggleResponse),
        (status = 400, description = "Malformed ID", body = crate::error::AppError),
        (status = 404, description = "Portfolio not found", body = crate::error::AppError),
    ),
    tag = "votes"
)]
pub async fn vote_portfolio(
    Extension(repo): Extension<DynRepository>,
    voter: VoterIp,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let portfolio_id = parse_portfolio_id(&id)?;
    let outcome = VoteService::new(repo)
        .toggle(voter.as_str(), portfolio_id)
        .await?;

    Ok(ApiResponse::ok(VoteToggleResponse {
        portfolio_id,
        voted: outcome.is_voted(),
    }))
}
