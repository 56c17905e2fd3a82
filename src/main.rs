use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use std::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use userbase_server::{cors_headers, configure_app, AppState, Settings};

#[actix_web::main]
async fn main() {
    // A missing .env file is fine, DATABASE_URL may come from the environment
    dotenv().ok();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    if let Err(e) = run().await {
        error!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Settings::new().context("failed to load configuration")?;
    info!("Configuration loaded successfully");

    let state = AppState::new(&config)
        .await
        .context("failed to initialize credential store")?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("failed to bind {}", address))?;
    info!("API server listening on http://{}", address);

    let data = web::Data::new(state.clone());
    let served = HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .configure(configure_app)
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await;

    state.shutdown().await;
    served.context("HTTP server terminated with an error")
}
