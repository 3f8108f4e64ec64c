use crate::{
    error::AppResult,
    models::{
        portfolio, vote, NewPortfolio, Portfolio, PortfolioModel, PortfolioView, Vote, VoteModel,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, Set, Statement, TransactionTrait,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub type DynRepository = Arc<dyn PortfolioRepository>;

/// Relational side of the storage gateway.
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    async fn find_portfolio(&self, id: Uuid) -> AppResult<Option<PortfolioModel>>;

    async fn find_vote(&self, ip: &str, portfolio_id: Uuid) -> AppResult<Option<VoteModel>>;

    async fn insert_vote(&self, ip: &str, portfolio_id: Uuid) -> AppResult<()>;

    async fn delete_vote(&self, vote_id: Uuid) -> AppResult<()>;

    /// All portfolios, newest first, with vote counts and whether `ip` voted.
    async fn list_portfolios_with_votes(&self, ip: &str) -> AppResult<Vec<PortfolioView>>;

    async fn insert_portfolio(&self, new: NewPortfolio) -> AppResult<PortfolioModel>;

    /// Flip the vote for `(ip, portfolio_id)`. Returns true if a vote now exists.
    ///
    /// The default is a plain read-then-write; backends shared between
    /// processes should override it with an atomic form.
    async fn toggle_vote(&self, ip: &str, portfolio_id: Uuid) -> AppResult<bool> {
        match self.find_vote(ip, portfolio_id).await? {
            Some(existing) => {
                self.delete_vote(existing.id).await?;
                Ok(false)
            }
            None => {
                self.insert_vote(ip, portfolio_id).await?;
                Ok(true)
            }
        }
    }
}

const LIST_WITH_VOTES_SQL: &str = r#"
SELECT p.id, p.name, p.url, p.image, p.created_at,
       CAST(COUNT(v.id) AS INT) AS votes_count,
       EXISTS (
           SELECT 1 FROM gemfolio_votes mine
           WHERE mine.ip = $1 AND mine.portfolio_id = p.id
       ) AS is_voted
FROM gemfolio_portfolios p
LEFT JOIN gemfolio_votes v ON v.portfolio_id = p.id
GROUP BY p.id
ORDER BY p.created_at DESC
"#;

pub struct SeaOrmRepository {
    db: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PortfolioRepository for SeaOrmRepository {
    async fn find_portfolio(&self, id: Uuid) -> AppResult<Option<PortfolioModel>> {
        Ok(Portfolio::find_by_id(id).one(&self.db).await?)
    }

    async fn find_vote(&self, ip: &str, portfolio_id: Uuid) -> AppResult<Option<VoteModel>> {
        Ok(Vote::find()
            .filter(vote::Column::Ip.eq(ip))
            .filter(vote::Column::PortfolioId.eq(portfolio_id))
            .one(&self.db)
            .await?)
    }

    async fn insert_vote(&self, ip: &str, portfolio_id: Uuid) -> AppResult<()> {
        self.db
            .execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "INSERT INTO gemfolio_votes (ip, portfolio_id)
                 VALUES ($1, $2)
                 ON CONFLICT (ip, portfolio_id) DO NOTHING",
                vec![ip.into(), portfolio_id.into()],
            ))
            .await?;
        Ok(())
    }

    async fn delete_vote(&self, vote_id: Uuid) -> AppResult<()> {
        Vote::delete_by_id(vote_id).exec(&self.db).await?;
        Ok(())
    }

    async fn list_portfolios_with_votes(&self, ip: &str) -> AppResult<Vec<PortfolioView>> {
        let views = PortfolioView::find_by_statement(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            LIST_WITH_VOTES_SQL,
            vec![ip.into()],
        ))
        .all(&self.db)
        .await?;
        Ok(views)
    }

    async fn insert_portfolio(&self, new: NewPortfolio) -> AppResult<PortfolioModel> {
        let active = portfolio::ActiveModel {
            email: Set(new.email),
            name: Set(new.name),
            url: Set(new.url),
            image: Set(new.image),
            ..Default::default()
        };
        Ok(active.insert(&self.db).await?)
    }

    async fn toggle_vote(&self, ip: &str, portfolio_id: Uuid) -> AppResult<bool> {
        let txn = self.db.begin().await?;

        let removed = txn
            .query_one(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "DELETE FROM gemfolio_votes
                 WHERE ip = $1 AND portfolio_id = $2
                 RETURNING id",
                vec![ip.into(), portfolio_id.into()],
            ))
            .await?
            .is_some();

        if !removed {
            // A concurrent toggle that inserted first wins; the unique index
            // turns ours into a no-op instead of a duplicate row.
            txn.execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "INSERT INTO gemfolio_votes (ip, portfolio_id)
                 VALUES ($1, $2)
                 ON CONFLICT (ip, portfolio_id) DO NOTHING",
                vec![ip.into(), portfolio_id.into()],
            ))
            .await?;
        }

        txn.commit().await?;
        Ok(!removed)
    }
}

#[derive(Default)]
struct MemoryTables {
    portfolios: Vec<PortfolioModel>,
    votes: Vec<VoteModel>,
}

/// Process-local repository; toggles are atomic under its single lock.
#[derive(Default, Clone)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<MemoryTables>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn portfolios(&self) -> Vec<PortfolioModel> {
        self.lock().portfolios.clone()
    }

    pub fn votes(&self) -> Vec<VoteModel> {
        self.lock().votes.clone()
    }

    /// Insert a fully specified row, bypassing storage defaults.
    pub fn seed_portfolio(&self, model: PortfolioModel) {
        self.lock().portfolios.push(model);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryTables> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PortfolioRepository for InMemoryRepository {
    async fn find_portfolio(&self, id: Uuid) -> AppResult<Option<PortfolioModel>> {
        Ok(self.lock().portfolios.iter().find(|p| p.id == id).cloned())
    }

    async fn find_vote(&self, ip: &str, portfolio_id: Uuid) -> AppResult<Option<VoteModel>> {
        Ok(self
            .lock()
            .votes
            .iter()
            .find(|v| v.ip == ip && v.portfolio_id == portfolio_id)
            .cloned())
    }

    async fn insert_vote(&self, ip: &str, portfolio_id: Uuid) -> AppResult<()> {
        let mut tables = self.lock();
        if !tables
            .votes
            .iter()
            .any(|v| v.ip == ip && v.portfolio_id == portfolio_id)
        {
            tables.votes.push(VoteModel {
                id: Uuid::new_v4(),
                ip: ip.to_string(),
                portfolio_id,
            });
        }
        Ok(())
    }

    async fn delete_vote(&self, vote_id: Uuid) -> AppResult<()> {
        self.lock().votes.retain(|v| v.id != vote_id);
        Ok(())
    }

    async fn list_portfolios_with_votes(&self, ip: &str) -> AppResult<Vec<PortfolioView>> {
        let tables = self.lock();
        let mut views: Vec<PortfolioView> = tables
            .portfolios
            .iter()
            .map(|p| {
                let mut votes_count = 0;
                let mut is_voted = false;
                for v in tables.votes.iter().filter(|v| v.portfolio_id == p.id) {
                    votes_count += 1;
                    is_voted |= v.ip == ip;
                }
                PortfolioView {
                    id: p.id,
                    name: p.name.clone(),
                    url: p.url.clone(),
                    image: p.image.clone(),
                    created_at: p.created_at,
                    votes_count,
                    is_voted,
                }
            })
            .collect();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(views)
    }

    async fn insert_portfolio(&self, new: NewPortfolio) -> AppResult<PortfolioModel> {
        let model = PortfolioModel {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
            url: new.url,
            image: new.image,
            created_at: Utc::now().fixed_offset(),
            published: false,
        };
        self.lock().portfolios.push(model.clone());
        Ok(model)
    }

    async fn toggle_vote(&self, ip: &str, portfolio_id: Uuid) -> AppResult<bool> {
        let mut tables = self.lock();
        let before = tables.votes.len();
        tables
            .votes
            .retain(|v| !(v.ip == ip && v.portfolio_id == portfolio_id));
        if tables.votes.len() != before {
            return Ok(false);
        }
        tables.votes.push(VoteModel {
            id: Uuid::new_v4(),
            ip: ip.to_string(),
            portfolio_id,
        });
        Ok(true)
    }
}
