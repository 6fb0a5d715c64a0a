use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use quiz_generator::{
    config::{Config, LoggingConfig},
    create_router, log_system_event, AppState, QuizService, UploadService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = setup_logging(&config.logging)?;
    config.log_configuration_summary();
    config.validate()?;

    log_system_event!(startup, component = "server", "Starting Quiz Generator server");

    let quiz_service = QuizService::from_config(&config.generator)?;
    info!(
        provider = quiz_service.provider_name(),
        model = quiz_service.model_name(),
        endpoint = %config.generator.endpoint,
        "Initialized generation backend"
    );

    let upload_service = UploadService::new(&config.upload.directory, &config.server.public_base_url);
    upload_service.ensure_upload_dir().await?;
    info!(upload_directory = %config.upload.directory, "Upload directory ready");

    let state = AppState {
        quiz_service,
        upload_service,
    };

    let app = create_router(state).layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    let addr = config.server.bind_address();
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_system_event!(shutdown, component = "server", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

fn setup_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_new(&config.level)
        .unwrap_or_else(|_| EnvFilter::new("info,quiz_generator=debug"));

    let console_layer = config.console_enabled.then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(true)
            .boxed()
    });

    let (file_layer, guard) = if config.file_enabled {
        std::fs::create_dir_all(&config.log_directory).unwrap_or_else(|e| {
            eprintln!("Warning: Could not create logs directory: {}", e);
        });

        // Daily rotation, no ANSI colors in files
        let file_appender = tracing_appender::rolling::daily(&config.log_directory, "quiz-generator.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(non_blocking_file)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!(
        log_directory = %config.log_directory,
        file_enabled = config.file_enabled,
        console_enabled = config.console_enabled,
        "Logging initialized"
    );

    Ok(guard)
}
