use crate::{
    error::{AppError, AppResult},
    services::repository::DynRepository,
};
use uuid::Uuid;

pub struct VoteService {
    repo: DynRepository,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Voted,
    Unvoted,
}

impl VoteOutcome {
    pub fn is_voted(self) -> bool {
        matches!(self, VoteOutcome::Voted)
    }
}

impl VoteService {
    pub fn new(repo: DynRepository) -> Self {
        Self { repo }
    }

    /// Toggle `voter`'s vote on a portfolio: remove it if present, add it otherwise.
    pub async fn toggle(&self, voter: &str, portfolio_id: Uuid) -> AppResult<VoteOutcome> {
        self.repo
            .find_portfolio(portfolio_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let voted = self.repo.toggle_vote(voter, portfolio_id).await?;
        let outcome = if voted {
            VoteOutcome::Voted
        } else {
            VoteOutcome::Unvoted
        };

        tracing::debug!(%portfolio_id, voter, ?outcome, "vote toggled");
        Ok(outcome)
    }
}
