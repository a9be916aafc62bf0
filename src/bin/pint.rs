//! CLI binary for public-cloud-info crate.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use public_cloud_info::{
    InfoClient, InfoError, OutputFormat, PublicCloudInfo, Query, ALL_REGIONS, DEFAULT_BASE_URL,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pint")]
#[command(
    author,
    version,
    about = "Query public cloud image and server information"
)]
struct Cli {
    /// Base URL of the info service
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Log filter decisions and requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List images of a framework
    Images {
        /// Framework name (amazon, google, microsoft, ...)
        framework: String,

        /// Image state (active, inactive, deprecated, deleted)
        #[arg(short, long)]
        state: Option<String>,

        #[command(flatten)]
        options: QueryOptions,
    },

    /// List update servers of a framework
    Servers {
        /// Framework name (amazon, google, microsoft, ...)
        framework: String,

        /// Server type (smt, regionserver, ...)
        #[arg(short = 't', long)]
        server_type: Option<String>,

        #[command(flatten)]
        options: QueryOptions,
    },

    /// List the known frameworks
    Providers {
        #[arg(short, long, default_value = "plain", value_parser = parse_format)]
        format: OutputFormat,
    },

    /// List the regions of a framework
    Regions {
        framework: String,

        #[arg(short, long, default_value = "plain", value_parser = parse_format)]
        format: OutputFormat,
    },

    /// List the image states of a framework
    ImageStates {
        framework: String,

        #[arg(short, long, default_value = "plain", value_parser = parse_format)]
        format: OutputFormat,
    },

    /// List the server types of a framework
    ServerTypes {
        framework: String,

        #[arg(short, long, default_value = "plain", value_parser = parse_format)]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct QueryOptions {
    /// Output format
    #[arg(short, long, default_value = "plain", value_parser = parse_format)]
    format: OutputFormat,

    /// Region name, or "all"
    #[arg(short, long, default_value = ALL_REGIONS)]
    region: String,

    /// Comma-separated filters, e.g. "name~sles,publishedon>20200101"
    #[arg(long)]
    filter: Option<String>,
}

impl QueryOptions {
    fn into_query(self, framework: String, selector: Option<String>) -> Query {
        let query = Query::new(framework)
            .with_format(self.format)
            .with_region(self.region);
        let query = match selector {
            Some(selector) => query.with_selector(selector),
            None => query,
        };
        match self.filter {
            Some(filter) => query.with_filter(filter),
            None => query,
        }
    }
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, InfoError> {
    let client = InfoClient::new(Duration::from_secs(cli.timeout), &cli.base_url)?;
    let info = PublicCloudInfo::with_client(client);

    match cli.command {
        Commands::Images {
            framework,
            state,
            options,
        } => info.images(&options.into_query(framework, state)).await,

        Commands::Servers {
            framework,
            server_type,
            options,
        } => {
            info.servers(&options.into_query(framework, server_type))
                .await
        }

        Commands::Providers { format } => info.providers(format).await,
        Commands::Regions { framework, format } => info.regions(&framework, format).await,
        Commands::ImageStates { framework, format } => {
            info.image_states(&framework, format).await
        }
        Commands::ServerTypes { framework, format } => {
            info.server_types(&framework, format).await
        }
    }
}
