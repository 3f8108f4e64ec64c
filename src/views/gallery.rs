use super::render;
use crate::models::PortfolioView;
use crate::services::ranking::SortKey;
use tera::Context;

pub fn render_gallery(portfolios: &[PortfolioView], sort: SortKey) -> tera::Result<String> {
    let mut context = Context::new();
    context.insert("portfolios", portfolios);
    context.insert("sort", sort.as_str());
    render("gallery.html", &context)
}
