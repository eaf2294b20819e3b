use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use listcraft_core::export::ExportFormat;
use listcraft_core::generation::{
    EmailTemplate, ListingLength, ListingStyle, ListingTone, SocialPlatform,
};
use listcraft_infrastructure::{ConfigService, ListcraftPaths};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "listcraft")]
#[command(about = "Listcraft CLI - streamed copy for property listings", long_about = None)]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Use this directory instead of the platform config directory
    #[arg(long, global = true, env = "LISTCRAFT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// API key for the generation backend
    #[arg(long, global = true, env = "LISTCRAFT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Property the command works on
    #[arg(long, global = true, default_value = "demo-property")]
    pub property: String,

    /// Setting to apply before running, as KEY=VALUE (repeatable)
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream generated copy to stdout
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
    },
    /// Import photos for the property and optionally reorder them
    Photos {
        /// Image files to import
        paths: Vec<PathBuf>,
        /// Reverse the imported order
        #[arg(long)]
        reverse: bool,
    },
    /// Manage brand voices
    Voices {
        #[command(subcommand)]
        action: VoiceAction,
    },
    /// Generate a listing and export it
    Export {
        format: ExportFormat,
        /// Target file or directory
        #[arg(default_value = ".")]
        destination: PathBuf,
    },
    /// Show current settings (secrets masked)
    Settings,
    /// Check or activate the license
    License {
        /// Key to activate, e.g. ABCD-EFGH-IJKL-MNOP
        key: Option<String>,
    },
    /// Inspect or initialize the client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run a full session: voice, listing, social post, photos and export
    Demo {
        /// Where the exported document goes
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum GenerateKind {
    /// Listing description
    Listing {
        #[arg(long)]
        style: Option<ListingStyle>,
        #[arg(long)]
        tone: Option<ListingTone>,
        #[arg(long)]
        length: Option<ListingLength>,
        /// SEO keyword (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        #[arg(long)]
        brand_voice: Option<String>,
    },
    /// Social media post
    Social {
        platform: SocialPlatform,
        #[arg(long)]
        brand_voice: Option<String>,
    },
    /// Email template
    Email {
        template: EmailTemplate,
    },
}

#[derive(Subcommand)]
pub enum VoiceAction {
    /// Create a voice from sample listings, then list all voices
    Create {
        name: String,
        /// Sample listing text (repeatable)
        #[arg(long = "sample", required = true)]
        samples: Vec<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List voices
    List,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the effective configuration to disk
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ListcraftPaths::new(cli.globals.config_dir.clone());
    let config_service = ConfigService::new(paths.clone());
    let config = config_service.get_config();
    let _log_guard = logging::init(&config, &paths, cli.globals.quiet)?;

    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Show => commands::config::show(&config_service),
            ConfigAction::Path => commands::config::path(&config_service),
            ConfigAction::Init => commands::config::init(&config_service),
        };
    }

    let session = commands::session::Session::open(&cli.globals, &config).await?;

    let outcome = match cli.command {
        Commands::Generate { kind } => commands::generate::run(&session, kind).await,
        Commands::Photos { paths, reverse } => {
            commands::photos::run(&session, paths, reverse).await
        }
        Commands::Voices { action } => commands::voices::run(&session, action).await,
        Commands::Export {
            format,
            destination,
        } => commands::export::run(&session, format, &destination).await,
        Commands::Settings => commands::settings::show(&session).await,
        Commands::License { key } => commands::license::run(&session, key).await,
        Commands::Demo { out } => commands::demo::run(&session, &out).await,
        Commands::Config { .. } => Ok(()),
    };

    session.close();
    outcome
}
