use std::{process, sync::Arc};

use askama::Template;
use contentpage::{
    application::{
        error::AppError, page::ContentPageService, resolver::ContentResolver,
        source::ContentSource,
    },
    config::{self, OutputFormat, RenderArgs},
    infra::{
        cms::CmsClient,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
    presentation::views::{ContentTemplate, RawMarkupPolicy},
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(settings, args).await,
    }
}

fn build_page_service(settings: &config::Settings) -> Result<ContentPageService, AppError> {
    let client = CmsClient::from_settings(&settings.content_service)?;
    let source: Arc<dyn ContentSource> = Arc::new(client);
    let resolver = ContentResolver::new(source, settings.content_service.categories_limit);
    Ok(ContentPageService::new(
        resolver,
        settings.content_service.admin_url.as_str(),
    ))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pages = build_page_service(&settings)?;
    let state = HttpState::new(
        pages,
        RawMarkupPolicy::from_flag(settings.render.sanitize_raw_markup),
    );
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;
    info!(
        addr = %settings.server.addr,
        content_service = %settings.content_service.base_url,
        "listening"
    );

    let drain = Arc::new(Notify::new());
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown({
            let drain = drain.clone();
            async move { drain.notified().await }
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            return result.map_err(|err| AppError::from(InfraError::from(err)));
        }
        () = shutdown_signal() => {}
    }

    info!(
        grace_seconds = settings.server.graceful_shutdown.as_secs(),
        "shutdown requested; draining connections"
    );
    drain.notify_one();

    match tokio::time::timeout(settings.server.graceful_shutdown, server).await {
        Ok(result) => result.map_err(|err| AppError::from(InfraError::from(err))),
        Err(_) => {
            warn!("graceful shutdown timed out; dropping open connections");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn run_render(settings: config::Settings, args: RenderArgs) -> Result<(), AppError> {
    let pages = build_page_service(&settings)?;
    let view = pages.page_view().await;

    let output = match args.format {
        OutputFormat::Html => {
            let policy = RawMarkupPolicy::from_flag(settings.render.sanitize_raw_markup);
            ContentTemplate::new(view, policy)
                .render()
                .map_err(|err| AppError::unexpected(format!("template rendering failed: {err}")))?
        }
        OutputFormat::Json => serde_json::to_string_pretty(&view)
            .map_err(|err| AppError::unexpected(format!("failed to encode page: {err}")))?,
    };

    println!("{output}");
    Ok(())
}
