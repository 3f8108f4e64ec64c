use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GemfolioVotes {
    Table,
    Id,
    Ip,
    PortfolioId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GemfolioVotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GemfolioVotes::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(GemfolioVotes::Ip).text().not_null())
                    .col(ColumnDef::new(GemfolioVotes::PortfolioId).uuid().not_null())
                    .to_owned(),
            )
            .await?;

        // One vote per voter and portfolio; toggles rely on it to stay atomic.
        manager
            .create_index(
                Index::create()
                    .name("idx_gemfolio_votes_unique")
                    .table(GemfolioVotes::Table)
                    .col(GemfolioVotes::Ip)
                    .col(GemfolioVotes::PortfolioId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gemfolio_votes_portfolio_id")
                    .table(GemfolioVotes::Table)
                    .col(GemfolioVotes::PortfolioId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GemfolioVotes::Table).to_owned())
            .await
    }
}
