#![allow(dead_code)]

use gemfolio::models::PortfolioModel;
use gemfolio::services::repository::{DynRepository, InMemoryRepository};
use gemfolio::services::storage::{DynObjectStore, InMemoryObjectStore};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT: Once = Once::new();

pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
pub const CDN: &str = "https://cdn.test/images";

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var("ENABLE_HSTS", "false");
    });
}

pub struct TestApp {
    pub addr: String,
    pub repo: InMemoryRepository,
    pub store: InMemoryObjectStore,
    pub client: Client,
    /// Client that reports redirects instead of following them.
    pub raw_client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }

    /// Insert a portfolio created `age_hours` ago and return its id.
    pub fn seed(&self, name: &str, age_hours: i64) -> Uuid {
        let id = Uuid::new_v4();
        let slug = name.to_lowercase().replace(' ', "-");
        self.repo.seed_portfolio(PortfolioModel {
            id,
            email: format!("{}@example.com", slug),
            name: name.to_string(),
            url: format!("https://{}.dev", slug),
            image: format!("{}/{}.png", CDN, slug),
            created_at: chrono::Utc::now().fixed_offset() - chrono::Duration::hours(age_hours),
            published: false,
        });
        id
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let repo = InMemoryRepository::new();
    let store = InMemoryObjectStore::new(CDN);
    let dyn_repo: DynRepository = Arc::new(repo.clone());
    let dyn_store: DynObjectStore = Arc::new(store.clone());

    let app = axum::Router::new()
        .merge(gemfolio::routes::create_routes())
        .layer(axum::middleware::from_fn(
            gemfolio::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(dyn_repo))
        .layer(axum::extract::Extension(dyn_store));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        repo,
        store,
        client: Client::new(),
        raw_client: Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap(),
    }
}

pub fn png_part(filename: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(PNG.to_vec())
        .file_name(filename.to_string())
        .mime_str("image/png")
        .unwrap()
}
