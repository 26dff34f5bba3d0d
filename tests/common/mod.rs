//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use role_servant::config::ServantConfig;
use role_servant::servant::Registry;
use role_servant::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A servant running on an ephemeral local port.
pub struct RunningServant {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningServant {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a servant for `registry` on 127.0.0.1 with an OS-chosen port.
pub async fn start_servant(config: ServantConfig, registry: Registry) -> RunningServant {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, registry).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    RunningServant { addr, shutdown }
}

/// HTTP client that never pools or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
