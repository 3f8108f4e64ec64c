pub mod portfolio;
pub mod vote;

pub use portfolio::{
    Entity as Portfolio, Model as PortfolioModel, NewPortfolio, PortfolioView,
};
pub use vote::{Entity as Vote, Model as VoteModel};
