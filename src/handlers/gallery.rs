use crate::error::{AppError, AppResult};
use crate::middleware::VoterIp;
use crate::services::ranking::{RankingService, SortKey};
use crate::services::repository::DynRepository;
use crate::services::vote::VoteService;
use crate::views;
use axum::{
    extract::{Form, Query},
    response::{Html, Redirect},
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    #[serde(rename = "portfolioId")]
    pub portfolio_id: Option<String>,
    pub sort: Option<String>,
}

pub(crate) fn parse_portfolio_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation("Invalid portfolio id".to_string()))
}

/// GET /: the gallery, ranked for the requesting voter.
pub async fn show_gallery(
    Extension(repo): Extension<DynRepository>,
    voter: VoterIp,
    Query(query): Query<GalleryQuery>,
) -> AppResult<Html<String>> {
    let sort = SortKey::parse(query.sort.as_deref());
    let portfolios = RankingService::new(repo).list(voter.as_str(), sort).await?;
    Ok(Html(views::render_gallery(&portfolios, sort)?))
}

/// POST /: toggle the requesting voter's vote, then redirect back to the gallery.
pub async fn toggle_vote(
    Extension(repo): Extension<DynRepository>,
    voter: VoterIp,
    Form(form): Form<VoteForm>,
) -> AppResult<Redirect> {
    let raw_id = form
        .portfolio_id
        .ok_or_else(|| AppError::Validation("Missing portfolio id".to_string()))?;
    let portfolio_id = parse_portfolio_id(&raw_id)?;
    VoteService::new(repo)
        .toggle(voter.as_str(), portfolio_id)
        .await?;

    let sort = SortKey::parse(form.sort.as_deref());
    Ok(Redirect::to(&format!("/?sort={}", sort.as_str())))
}
