use kerbal_relay::api::router::{create_client_router, create_router};
use kerbal_relay::api::state::AppState;
use kerbal_relay::config::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Handle --health-check flag for Docker HEALTHCHECK (works in scratch image).
    if std::env::args().any(|a| a == "--health-check") {
        match health_check().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Health check failed: {e}");
                std::process::exit(1);
            }
        }
    }

    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kerbal_relay=debug,tower_http=info".into()),
        )
        .init();

    tracing::info!("creating servers");

    let config = AppConfig::from_env();
    let panel_addr = config.bind_addr();
    let client_addr = config.client_bind_addr();
    let state = AppState::new(config);

    let panel_app = create_router(state.clone());
    let client_app = create_client_router(state);

    tracing::info!(
        "kerbal-relay v{}: interface on {panel_addr}, connection to KSP on {client_addr}",
        env!("CARGO_PKG_VERSION")
    );

    let panel_listener = match tokio::net::TcpListener::bind(&panel_addr).await {
        Ok(l) => l,
        Err(e) => fatal(&format!("failed to bind interface on {panel_addr}: {e}")),
    };
    let client_listener = match tokio::net::TcpListener::bind(&client_addr).await {
        Ok(l) => l,
        Err(e) => fatal(&format!("failed to bind KSP listener on {client_addr}: {e}")),
    };

    tracing::info!("we have liftoff!");

    let result = tokio::try_join!(
        axum::serve(panel_listener, panel_app).into_future(),
        axum::serve(client_listener, client_app).into_future(),
    );
    if let Err(e) = result {
        fatal(&format!("server error: {e}"));
    }
}

fn fatal(message: &str) -> ! {
    tracing::error!("{message}");
    std::process::exit(1);
}

/// Lightweight health check: send raw HTTP/1.1 request and check for 200 OK.
async fn health_check() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "4326".to_string());
    let mut stream = tokio::net::TcpStream::connect(format!("127.0.0.1:{port}")).await?;
    let request =
        format!("GET /health HTTP/1.1\r\nHost: 127.0.0.1:{port}\r\nConnection: close\r\n\r\n");
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    stream.write_all(request.as_bytes()).await?;
    let mut buf = vec![0u8; 1024];
    let n = stream.read(&mut buf).await?;
    let response = String::from_utf8_lossy(&buf[..n]);
    if response.starts_with("HTTP/1.1 200") {
        Ok(())
    } else {
        Err(format!(
            "Unexpected response: {}",
            response.lines().next().unwrap_or("")
        )
        .into())
    }
}
