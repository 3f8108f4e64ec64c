use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GemfolioPortfolios {
    Table,
    Id,
    Email,
    Name,
    Url,
    Image,
    CreatedAt,
    Published,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GemfolioPortfolios::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GemfolioPortfolios::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(GemfolioPortfolios::Email).text().not_null())
                    .col(ColumnDef::new(GemfolioPortfolios::Name).text().not_null())
                    .col(ColumnDef::new(GemfolioPortfolios::Url).text().not_null())
                    .col(ColumnDef::new(GemfolioPortfolios::Image).text().not_null())
                    .col(
                        ColumnDef::new(GemfolioPortfolios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GemfolioPortfolios::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gemfolio_portfolios_created_at")
                    .table(GemfolioPortfolios::Table)
                    .col(GemfolioPortfolios::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GemfolioPortfolios::Table).to_owned())
            .await
    }
}
