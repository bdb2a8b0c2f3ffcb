use actix_web::{web, HttpServer};
use clap::Parser;
use grantdesk::api::api_router;
use grantdesk::api::errors::handle_json_payload_error;
use grantdesk::cli::CLIArgs;
use grantdesk::logging::initialize_tracing;
use grantdesk::state::ApplicationStateInner;
use grantdesk::MIGRATOR;
use grantdesk_configuration::Configuration;
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;



#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments.
    let arguments = CLIArgs::parse();

    // Load configuration.
    let configuration = match arguments.configuration_file_path.as_ref() {
        Some(path) => {
            println!("Loading configuration: {}", path.display());
            Configuration::load_from_path(path)
        }
        None => {
            println!("Loading configuration at default path.");
            Configuration::load_from_default_path()
        }
    }
    .into_diagnostic()
    .wrap_err("Failed to load configuration file.")?;


    let logging_guard = initialize_tracing(
        configuration.logging.console_output_level_filter(),
        configuration.logging.log_file_output_level_filter(),
        &configuration.logging.log_file_output_directory,
        "grantdesk.log",
    )
    .into_diagnostic()
    .wrap_err("Failed to initialize tracing.")?;

    info!(
        file_path = configuration.configuration_file_path.to_string_lossy().as_ref(),
        "Configuration loaded."
    );


    // Initialize the database connection pool and other shared state.
    let state = web::Data::new(
        ApplicationStateInner::new(configuration.clone())
            .await
            .into_diagnostic()
            .wrap_err("Failed to set up application state.")?,
    );

    if arguments.apply_pending_migrations {
        info!("Applying any pending database migrations.");

        MIGRATOR
            .run(&state.database_pool)
            .await
            .into_diagnostic()
            .wrap_err("Failed to apply pending database migrations.")?;
    }


    // Initialize and start the actix HTTP server.
    #[rustfmt::skip]
    let server = HttpServer::new({
        let state = state.clone();

        move || {
            let json_extractor_config = actix_web::web::JsonConfig::default()
                .error_handler(handle_json_payload_error);

            // FIXME Modify permissive CORS to something more safe in production.
            let cors = actix_cors::Cors::permissive().expose_headers(vec![
                "Date",
                "Content-Type",
                "Content-Length",
            ]);

            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .wrap(cors)
                .wrap(tracing_actix_web::TracingLogger::default())
                .app_data(json_extractor_config)
                .app_data(state.clone())
                .service(api_router())
        }
    })
        .bind((
            configuration.http.host.as_str(),
            configuration.http.port,
        ))
        .into_diagnostic()
        .wrap_err("Failed to set up actix HTTP server.")?;

    info!(
        host = configuration.http.host.as_str(),
        port = configuration.http.port,
        "HTTP server initialized and running."
    );

    // Run HTTP server until stopped.
    server
        .run()
        .await
        .into_diagnostic()
        .wrap_err("Errored while running actix HTTP server.")?;


    drop(logging_guard);

    Ok(())
}
