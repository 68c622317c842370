use clap::Parser;
use std::path::PathBuf;

const HELP_EPILOG: &str = r#"Every option can also be provided via environment variables
(a .env file in the working directory is loaded first):
  CONFIG_PATH   (default: ./config.yaml, optional)
  DATABASE_URL  SQLite database file; unset => static demo mode
  PORT          (default: 8080 or config listen_port)
  STATIC_DIR    (default: ./public)
  CORS_ORIGIN   (default: any origin)
"#;

#[derive(Debug, Parser)]
#[command(
    name = "sharkfinn-server",
    version,
    about = "SharkFinn Learning backend",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// YAML config file; values given here or via env override it
    #[arg(long, env = "CONFIG_PATH", default_value = "config.yaml")]
    pub config: PathBuf,
    /// SQLite database file. Without one the server runs in static mode.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
    /// Listen port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
    /// Directory holding the built frontend
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
    /// Only allow this CORS origin
    #[arg(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}
