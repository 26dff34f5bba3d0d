//! A custom servant built on the library.
//!
//! ```text
//! curl localhost:8081/protocol
//! curl localhost:8081/light/porch
//! curl -X POST localhost:8081/light/porch -d 'level=30'
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use role_servant::servant::{HandlerDescriptor, Registry};
use role_servant::{HttpServer, ServantConfig, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let levels: Arc<Mutex<HashMap<String, u8>>> = Arc::default();

    let mut registry = Registry::new();
    registry.set_role_url("http://example.com/roles/lights/v1");

    let read = levels.clone();
    registry.register_handler(
        HandlerDescriptor::new("get level", "GET", "/light/$(name)"),
        move |name: String| -> Result<String, String> {
            let levels = read.lock().map_err(|e| e.to_string())?;
            Ok(levels.get(&name).copied().unwrap_or(0).to_string())
        },
    )?;

    let write = levels.clone();
    registry.register_handler(
        HandlerDescriptor::new("set level", "POST", "/light/$(name)").with_data("level=$(level)"),
        move |name: String, level: String| -> Result<(), String> {
            let level: u8 = level.parse().map_err(|_| format!("not a level: {level}"))?;
            write.lock().map_err(|e| e.to_string())?.insert(name, level);
            Ok(())
        },
    )?;

    let addr = SocketAddr::from(([127, 0, 0, 1], 8081));
    let mut config = ServantConfig::default();
    config.listener.bind_address = addr.to_string();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Lights servant is listening on http://{}", addr);

    let shutdown = Shutdown::new();
    HttpServer::new(config, registry)?
        .run(listener, shutdown.subscribe())
        .await?;
    Ok(())
}
