//! HTTP liveness endpoint for hosting-platform health checks.

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, extract::State, response::Html, routing::get};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::base::types::Void;

/// Connection status of the chat session, shared with the HTTP endpoint.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Debug, Clone)]
pub struct BotStatus {
    started_at: DateTime<Utc>,
    bot_tag: Arc<RwLock<Option<String>>>,
}

impl Default for BotStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStatus {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            bot_tag: Arc::new(RwLock::new(None)),
        }
    }

    /// Records the bot's display tag once the session is established.
    pub async fn set_bot_tag(&self, tag: String) {
        *self.bot_tag.write().await = Some(tag);
    }

    pub async fn bot_tag(&self) -> Option<String> {
        self.bot_tag.read().await.clone()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

async fn index_handler(State(status): State<BotStatus>) -> Html<String> {
    let tag = status.bot_tag().await.unwrap_or_else(|| "Connecting...".to_string());

    Html(render_status_page(&tag, status.started_at()))
}

fn render_status_page(tag: &str, started_at: DateTime<Utc>) -> String {
    format!(
        r#"<html>
  <head><title>Mania Bot Monitor</title></head>
  <body style="background:#1a1a1a; color:white; font-family:sans-serif; text-align:center; padding-top:50px;">
    <h1 style="color:#7289da;">🤖 Mania Bot is Running</h1>
    <hr style="width:50%; border:1px solid #333;">
    <p>Status: <span style="color:#43b581;">ONLINE</span></p>
    <p>Bot Tag: <strong>{}</strong></p>
    <p>Up since: {}</p>
  </body>
</html>
"#,
        escape_html(tag),
        started_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Creates the liveness router.
pub fn create_router(status: BotStatus) -> Router {
    Router::new().route("/", get(index_handler)).with_state(status)
}

/// Serves the liveness endpoint until the process stops.
pub async fn serve(status: BotStatus, port: u16) -> Void {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Web server online on port {}.", port);

    axum::serve(listener, create_router(status)).await?;

    Ok(())
}

// Tests.
