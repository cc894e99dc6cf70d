#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use due_date_tool::persistence::failure_log::DEFAULT_FAILURE_LOG;
    use due_date_tool::{AsanaConfig, AsanaSink, http_api, telemetry};

    telemetry::init_tracing();
    let config = AsanaConfig::from_env()?;

    let addr: SocketAddr = std::env::var("DUE_DATE_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    println!("due-date-tool HTTP API listening on http://{addr}");
    let state = http_api::AppState::new(Arc::new(AsanaSink::new(config)))
        .with_log_path(DEFAULT_FAILURE_LOG)
        .with_pause(Duration::from_millis(50));
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
