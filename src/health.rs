//! Liveness endpoint for the hosting platform.

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tracing::info;

use crate::error::AppError;

pub const RUNNING_MESSAGE: &str = "Football Bot is running ✅";

async fn running() -> &'static str {
    RUNNING_MESSAGE
}

pub fn router() -> Router {
    Router::new().route("/", get(running))
}

pub async fn serve(port: u16) -> Result<(), AppError> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    serve_on(listener).await
}

pub async fn serve_on(listener: TcpListener) -> Result<(), AppError> {
    info!(addr = %listener.local_addr()?, "🌐 Liveness endpoint listening");
    axum::serve(listener, router()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn root_reports_running() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_on(listener));

        let res = reqwest::get(format!("http://{addr}/")).await.unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert_eq!(res.text().await.unwrap(), RUNNING_MESSAGE);
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_on(listener));

        let res = reqwest::get(format!("http://{addr}/status")).await.unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
