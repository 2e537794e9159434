use std::{net::SocketAddr, time::Duration};

use anyhow::{Result, anyhow};
use axum_test::TestServer;
use sshcheck_server::{AppState, ServerConfig, create_app};
use tokio::{net::TcpListener, task::JoinHandle};

// Code is used by test modules, but not in this scope
#[allow(unused)]
pub fn test_state(staleness: Duration) -> AppState {
    AppState::new(ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        staleness,
        ..ServerConfig::default()
    })
}

#[allow(unused)]
pub fn test_server(state: AppState) -> Result<TestServer> {
    TestServer::new(create_app(state)).map_err(|err| anyhow!(err.to_string()))
}

/// A registry served on a real socket, for tests that go through
/// `RegistryClient`.
#[allow(unused)]
#[derive(Debug)]
pub struct RunningRegistry {
    pub base_url: String,
    pub state: AppState,
    handle: JoinHandle<()>,
}

impl Drop for RunningRegistry {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[allow(unused)]
pub async fn spawn_registry(staleness: Duration) -> Result<RunningRegistry> {
    let state = test_state(staleness);
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let app = create_app(state.clone());

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(RunningRegistry {
        base_url: format!("http://{addr}"),
        state,
        handle,
    })
}
