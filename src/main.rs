use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use top_heat::{config, error, info, server};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name = env!("CARGO_PKG_NAME"),
  bin_name = env!("CARGO_PKG_NAME"),
  about = env!("CARGO_PKG_DESCRIPTION"),
  styles = styles(),
)]
struct Cli {
    /// Address to listen on, overrides SERVER_ADDRESS
    #[clap(long)]
    addr: Option<String>,

    /// Open the app in the default browser once it is listening
    #[clap(long)]
    open: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    for path in config::load_env() {
        info!("Loaded environment from {}", path.display());
    }

    let mut settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    if let Some(addr) = cli.addr {
        settings.server_addr = match addr.parse() {
            Ok(addr) => addr,
            Err(e) => error!("Failed to parse server address {}: {}", addr, e),
        };
    }

    if let Err(e) = server::start_api_server(settings, cli.open).await {
        error!("Server stopped: {}", e);
    }
}
