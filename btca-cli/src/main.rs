//! btca CLI - ask natural-language questions about a library, answered
//! straight from a local clone of its source.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use btca_core::Registry;
use commands::{
    AskArgs, BookmarkArgs, CleanArgs, ConfigArgs, HistoryArgs, RepoArgs, ServeArgs, StatsArgs,
    StatusArgs, UpdateArgs,
};

/// btca: ask questions about a library straight from its source
#[derive(Parser, Debug)]
#[command(name = "btca")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question about a configured repo
    #[command(visible_alias = "a")]
    Ask(AskArgs),

    /// Manage the repo registry
    Repo(RepoArgs),

    /// Show repo health (one repo, or all)
    Status(StatusArgs),

    /// Clone or fast-forward every configured repo
    Update(UpdateArgs),

    /// Remove local clones; registry entries survive
    Clean(CleanArgs),

    /// Inspect or modify the configuration document
    Config(ConfigArgs),

    /// Browse past questions and answers
    History(HistoryArgs),

    /// Keep answers worth returning to
    Bookmark(BookmarkArgs),

    /// Show repository statistics
    Stats(StatsArgs),

    /// Serve the question endpoint over HTTP
    Serve(ServeArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // diagnostics go to stderr so primary output stays pipeable
    let filter = if cli.verbose {
        EnvFilter::new("btca_core=debug,btca_server=debug,btca_cli=debug,info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut registry = Registry::open_default()?;

    match cli.command {
        Commands::Ask(args) => args.execute(&registry).await,
        Commands::Repo(args) => args.execute(&mut registry).await,
        Commands::Status(args) => args.execute(&registry).await,
        Commands::Update(args) => args.execute(&registry).await,
        Commands::Clean(args) => args.execute(&registry).await,
        Commands::Config(args) => args.execute(&mut registry).await,
        Commands::History(args) => args.execute().await,
        Commands::Bookmark(args) => args.execute().await,
        Commands::Stats(args) => args.execute(&registry).await,
        Commands::Serve(args) => args.execute(registry).await,
    }
}
