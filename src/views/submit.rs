use super::render;
use tera::Context;

pub fn render_submit_page() -> tera::Result<String> {
    render("submit.html", &Context::new())
}
