use std::sync::Arc;

use formlane_store::InMemoryStore;

#[tokio::main]
async fn main() {
    formlane_observability::init();

    let addr = std::env::var("FORMLANE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let store = Arc::new(InMemoryStore::new());
    let app = formlane_api::app::build_app(store);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
