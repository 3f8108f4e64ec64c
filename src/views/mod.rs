//! Server-rendered pages. Templates under `templates/` are compiled into the
//! binary and rendered with Tera; `.html` templates auto-escape every value.

pub mod gallery;
pub mod submit;

pub use gallery::render_gallery;
pub use submit::render_submit_page;

use std::sync::LazyLock;
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("gallery.html", include_str!("../../templates/gallery.html")),
    ("submit.html", include_str!("../../templates/submit.html")),
];

static ENGINE: LazyLock<Tera> = LazyLock::new(|| {
    build_engine().unwrap_or_else(|e| {
        tracing::error!("Failed to load page templates: {:?}", e);
        Tera::default()
    })
});

fn build_engine() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    Ok(tera)
}

fn render(template: &str, context: &Context) -> tera::Result<String> {
    ENGINE.render(template, context)
}
