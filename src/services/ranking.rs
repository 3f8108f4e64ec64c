use crate::{error::AppResult, models::PortfolioView, services::repository::DynRepository};

/// Gallery ordering. Anything other than `latest` ranks by votes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Top,
    Latest,
}

impl SortKey {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("latest") => SortKey::Latest,
            _ => SortKey::Top,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Top => "top",
            SortKey::Latest => "latest",
        }
    }
}

pub struct RankingService {
    repo: DynRepository,
}

impl RankingService {
    pub fn new(repo: DynRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, voter: &str, sort: SortKey) -> AppResult<Vec<PortfolioView>> {
        let mut portfolios = self.repo.list_portfolios_with_votes(voter).await?;
        rank(&mut portfolios, sort);
        Ok(portfolios)
    }
}

/// Order views in place. Input is expected newest-first, so a stable sort by
/// votes keeps recency as the tie-break.
pub fn rank(portfolios: &mut [PortfolioView], sort: SortKey) {
    match sort {
        SortKey::Latest => portfolios.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Top => portfolios.sort_by(|a, b| b.votes_count.cmp(&a.votes_count)),
    }
}
