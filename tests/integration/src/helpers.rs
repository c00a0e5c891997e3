//! Test helpers for integration tests
//!
//! Spawns the gateway against the in-memory event store and provides thin
//! HTTP/WebSocket client wrappers.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use futures_util::StreamExt;
use ovation_common::{
    AppConfig, AppSettings, Environment, HubSettings, ServerConfig, StoreBackend,
};
use ovation_gateway::protocol::LiveFrame;
use ovation_gateway::{create_app, create_gateway_state};
use reqwest::{Client, Response};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};

/// Configuration for a test gateway: memory store, eviction disabled
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "ovation-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        store: StoreBackend::Memory,
        database: None,
        hub: HubSettings {
            subscriber_buffer: 100,
            room_idle_ttl_secs: 0,
        },
    }
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server on an ephemeral port
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_gateway_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            client: Client::new(),
            _handle: handle,
        })
    }

    /// Full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// WebSocket URL for a room's live stream
    pub fn ws_url(&self, room: &str) -> String {
        format!("ws://{}/rooms/{room}/live", self.addr)
    }

    /// Submit one reaction over HTTP
    pub async fn submit(&self, room: &str, recipient: Option<&str>) -> Result<Response> {
        let body = match recipient {
            Some(name) => json!({ "recipient_name": name }),
            None => json!({}),
        };
        Ok(self
            .client
            .post(self.url(&format!("/rooms/{room}/reactions")))
            .json(&body)
            .send()
            .await?)
    }

    /// Read a room's snapshot over HTTP
    pub async fn snapshot(&self, room: &str) -> Result<serde_json::Value> {
        Ok(self
            .client
            .get(self.url(&format!("/rooms/{room}")))
            .send()
            .await?
            .json()
            .await?)
    }
}

/// Client side of a live stream
pub type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Open a live stream for a room
pub async fn connect_live(server: &TestServer, room: &str) -> Result<WsClient> {
    let (socket, _) = connect_async(server.ws_url(room)).await?;
    Ok(socket)
}

/// Read the next live frame, skipping protocol chatter
pub async fn next_frame(socket: &mut WsClient) -> Result<LiveFrame> {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await?
            .ok_or_else(|| anyhow::anyhow!("live stream ended"))??;

        match message {
            tungstenite::Message::Text(text) => return Ok(LiveFrame::from_json(&text)?),
            tungstenite::Message::Ping(_) | tungstenite::Message::Pong(_) => {}
            other => anyhow::bail!("unexpected message on live stream: {other:?}"),
        }
    }
}

/// Assert that no further frame arrives within the window
pub async fn expect_silence(socket: &mut WsClient, window: Duration) -> Result<()> {
    match tokio::time::timeout(window, socket.next()).await {
        Err(_) => Ok(()),
        Ok(None) => anyhow::bail!("live stream ended unexpectedly"),
        Ok(Some(message)) => anyhow::bail!("unexpected frame: {message:?}"),
    }
}
