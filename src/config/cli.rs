use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, builder::BoolishValueParser};

/// Command-line arguments for the contentpage binary.
#[derive(Debug, Parser)]
#[command(
    name = "contentpage",
    version,
    about = "Content page server backed by a headless CMS"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "CONTENTPAGE_CONFIG_FILE",
        value_name = "PATH"
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP service.
    Serve(Box<ServeArgs>),
    /// Resolve the page once and print it to stdout.
    Render(RenderArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub content_service: ContentServiceOverrides,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Run raw markup through the sanitizer before printing.
    #[arg(
        long = "sanitize-raw-markup",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub sanitize_raw_markup: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ContentServiceOverrides {
    /// Override the content service base URL.
    #[arg(long = "content-service-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the URL of the CMS admin interface.
    #[arg(long = "admin-url", value_name = "URL")]
    pub admin_url: Option<String>,

    /// Override the content service request timeout.
    #[arg(long = "request-timeout-seconds", value_name = "SECONDS")]
    pub request_timeout_seconds: Option<u64>,

    /// Override the number of categories shown.
    #[arg(long = "categories-limit", value_name = "COUNT")]
    pub categories_limit: Option<u32>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub content_service: ContentServiceOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Run raw markup through the sanitizer before serving.
    #[arg(
        long = "sanitize-raw-markup",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub sanitize_raw_markup: Option<bool>,
}
