//! Roster API Server binary
//!
//! Serves the Excel roster template and previews uploaded copies.

use clap::Parser;
use roster_template::api::{run_api_server, server::ApiConfig};
use roster_template::config::TemplateConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "roster-server")]
#[command(version)]
#[command(about = "Roster API Server - Excel template download and upload preview")]
#[command(long_about = r#"
Roster API Server

Endpoints:
  - GET    /api/v1/template                 - Download user_template.xlsx
  - GET    /api/v1/lookup                   - Dropdown values (hidden sheet)
  - POST   /api/v1/preview?filename=NAME    - Upload a filled-in template (raw body)
  - GET    /api/v1/preview                  - Current preview rows
  - DELETE /api/v1/preview                  - Reset the preview

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  roster-server                           # Start on localhost:8080
  roster-server --host 0.0.0.0 --port 3000 --config roster.yaml

  curl -o user_template.xlsx http://localhost:8080/api/v1/template
  curl -X POST --data-binary @user_template.xlsx \
    "http://localhost:8080/api/v1/preview?filename=user_template.xlsx"
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "ROSTER_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "ROSTER_PORT")]
    port: u16,

    /// Template config (YAML); defaults to the built-in roster template
    #[arg(short, long, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let template = TemplateConfig::load(args.config.as_deref())?;
    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config, template).await
}
