use clap::{value_parser, Arg, Command};
use hello_users::config::{CliOverrides, ServerConfig};
use hello_users::server;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("hello-users")
        .version(env!("CARGO_PKG_VERSION"))
        .about("In-memory user CRUD service over HTTP")
        .arg(
            Arg::new("host")
                .long("host")
                .help("Address to bind (default 127.0.0.1)"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .value_parser(value_parser!(u16))
                .help("Port to listen on (default 8080)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML config file (default ./users.toml if present)"),
        )
        .get_matches();

    // Missing .env is fine
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let overrides = CliOverrides {
        config_path: matches.get_one::<PathBuf>("config").cloned(),
        host: matches.get_one::<String>("host").cloned(),
        port: matches.get_one::<u16>("port").copied(),
    };
    let config = ServerConfig::load(&overrides)?;

    server::start_server(config).await
}
