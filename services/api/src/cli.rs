use crate::admin::{run_bootstrap_admin, BootstrapAdminArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use bazaar::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Bazaar",
    about = "Run the multi-category marketplace service or explore it from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP and websocket service (default command)
    Serve(ServeArgs),
    /// Seed an in-memory marketplace and print what a visitor would see
    Demo(DemoArgs),
    /// Check the staff account that startup would create
    BootstrapAdmin(BootstrapAdminArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load the demo sellers, listings and conversations before accepting traffic
    #[arg(long)]
    pub(crate) seed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::BootstrapAdmin(args) => run_bootstrap_admin(args),
    }
}
