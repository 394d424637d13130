use clap::Parser;
use wme_cache::prelude::*;
use wme_cache::{config, credentials};

/// Create a local article cache from Wikimedia Enterprise snapshots
#[derive(Parser, Debug)]
#[command(name = "wme-cache")]
#[command(about = "Create a local article cache from Wikimedia Enterprise snapshots")]
#[command(version)]
struct Args {
    /// Display verbose output. If unspecified, use the WME_API_VERBOSE env variable.
    #[arg(short, long)]
    verbose: bool,

    /// Directory to store the output article files; it will be created as
    /// needed. If unspecified, use the WME_API_DIRECTORY env variable, else
    /// a subdirectory named cache relative to the working directory.
    #[arg(short, long)]
    directory: Option<String>,

    /// API username. If unspecified, use the WME_API_USERNAME env variable.
    #[arg(short, long)]
    username: Option<String>,

    /// API password. Prefix with @ to read from a file. Omit the value to be
    /// prompted. If unspecified, use the WME_API_PASSWORD env variable.
    #[arg(short, long, num_args = 0..=1, default_missing_value = "@stdin")]
    password: Option<String>,

    /// Namespaces to import, specified via namespace number. Repeat the
    /// option to select multiple namespaces. If unspecified, imports all
    /// namespaces present in the WME API.
    #[arg(short, long = "namespace")]
    namespaces: Vec<String>,

    /// Wikimedia project (database) name
    project: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Flags win over environment variables
    let verbose = args.verbose
        || std::env::var("WME_API_VERBOSE")
            .map(|v| config::env_flag(&v))
            .unwrap_or(false);
    let directory = args
        .directory
        .or_else(|| std::env::var("WME_API_DIRECTORY").ok())
        .unwrap_or_else(|| "cache".to_string());
    let username = args
        .username
        .or_else(|| std::env::var("WME_API_USERNAME").ok());
    let password = args
        .password
        .or_else(|| std::env::var("WME_API_PASSWORD").ok());

    // Credentials resolve before anything touches the network
    let credentials = credentials::resolve(username, password)?;

    let config = ConfigBuilder::new(args.project.as_str())
        .directory(directory)
        .namespaces(args.namespaces)
        .verbose(verbose)
        .build()?;

    std::fs::create_dir_all(config.project_dir())?;

    let session = Session::login(&credentials)?;
    let stats = SnapshotProcessor::new(config, session).run()?;

    println!(
        "Cached {} articles ({} skipped with no body)",
        stats.kept, stats.skipped
    );
    Ok(())
}
