use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use ycinv::config::{oauth_token_from_env, Config};
use ycinv::inventory::{self, ResourceKind};
use ycinv::monitoring;
use ycinv::yc::auth::Credentials;
use ycinv::yc::client::YcClient;
use ycinv::yc::clouds;

/// Version injected at compile time via YCINV_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("YCINV_VERSION") {
    Some(v) => v,
    None => "dev",
};

/// Yandex Cloud resource inventory and utilization collector
#[derive(Parser, Debug)]
#[command(name = "ycinv", version = VERSION, about, long_about = None)]
struct Args {
    /// Path to a service account key file (yc iam key create output)
    #[arg(short = 'k', long)]
    sa_key: Option<PathBuf>,

    /// Cloud id to scope discovery to
    #[arg(long)]
    cloud: Option<String>,

    /// Folder id to scope discovery and monitoring to
    #[arg(long)]
    folder: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List clouds visible to this identity
    Clouds,
    /// List folders of a cloud
    Folders,
    /// List one resource kind in a folder
    Resources {
        /// Resource kind: instances, disks, networks, subnets
        kind: String,
    },
    /// Walk the whole hierarchy and print the aggregated inventory
    Discover,
    /// Summarize an instance's CPU utilization
    Utilization {
        /// Compute instance id
        instance_id: String,
        /// Length of the query window in days
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Persist default settings for later runs
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ycinv started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ycinv").join("ycinv.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ycinv").join("ycinv.log");
    }
    PathBuf::from("ycinv.log")
}

/// Build credentials from CLI flags, environment, and the config file.
fn build_credentials(args: &Args, config: &Config) -> Result<Credentials> {
    let key_file = args
        .sa_key
        .clone()
        .or_else(|| config.effective_sa_key_file());

    let mut credentials = if let Some(path) = key_file {
        Credentials::from_key_file(&path)?
    } else if let Some(token) = oauth_token_from_env() {
        Credentials::from_oauth_token(token)
    } else {
        anyhow::bail!(
            "No credentials configured. Pass --sa-key, or set YC_SERVICE_ACCOUNT_KEY_FILE or YC_OAUTH_TOKEN"
        );
    };

    if let Some(cloud_id) = args.cloud.clone().or_else(|| config.effective_cloud_id()) {
        credentials = credentials.with_cloud_id(cloud_id);
    }
    if let Some(folder_id) = args.folder.clone().or_else(|| config.effective_folder_id()) {
        credentials = credentials.with_folder_id(folder_id);
    }

    Ok(credentials)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();

    if let Command::Config = args.command {
        if let Some(path) = args.sa_key.clone() {
            config.sa_key_file = Some(path);
        }
        if let Some(cloud_id) = args.cloud.clone() {
            config.cloud_id = Some(cloud_id);
        }
        if let Some(folder_id) = args.folder.clone() {
            config.folder_id = Some(folder_id);
        }
        config.save()?;
        println!("Saved configuration");
        return Ok(());
    }

    let credentials = build_credentials(&args, &config)?;
    let client = YcClient::new(credentials)?;

    match &args.command {
        Command::Clouds => {
            let visible = clouds::list_clouds(&client).await?;
            if visible.is_empty() {
                println!("No clouds visible to this identity");
            }
            for cloud in visible {
                println!("{}\t{}", cloud.id, cloud.name);
            }
        }
        Command::Folders => {
            let folders = clouds::list_folders(&client, args.cloud.as_deref()).await?;
            if folders.is_empty() {
                println!("No folders visible to this identity");
            }
            for folder in folders {
                println!(
                    "{}\t{}\t{}\t{}",
                    folder.id, folder.name, folder.cloud_id, folder.status
                );
            }
        }
        Command::Resources { kind } => {
            let Some(kind) = ResourceKind::from_key(kind) else {
                anyhow::bail!(
                    "Unknown resource kind '{}'. Expected one of: instances, disks, networks, subnets",
                    kind
                );
            };
            let items =
                inventory::list_resources(&client, kind, args.folder.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::Discover => {
            let summary = inventory::discover_all(&client).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Utilization { instance_id, days } => {
            let summary = monitoring::get_utilization(
                &client,
                instance_id,
                args.folder.as_deref(),
                *days,
            )
            .await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Config => unreachable!("handled above"),
    }

    Ok(())
}
