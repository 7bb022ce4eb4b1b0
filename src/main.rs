use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use address_validity::{
    load_registry, AppConfig, Geographic, LineProcessor, Locale, Registry, SourceEncoding,
};

#[derive(Parser)]
#[command(name = "address-validity")]
#[command(version)]
#[command(about = "Check street validity lines against the address registry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Address-point export to load (repeatable, added to the configured files)
    #[arg(long = "registry", short = 'r', global = true)]
    registry_files: Vec<PathBuf>,

    /// Character encoding of the address-point exports
    #[arg(long, global = true, value_enum)]
    encoding: Option<SourceEncoding>,

    /// Language of the validity lines
    #[arg(long, global = true, value_enum)]
    locale: Option<Locale>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a document and print the corrected lines with notes
    Check {
        /// City code
        city: u32,
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print address points grouped by marker lines, as JSON
    Points {
        city: u32,
        file: Option<PathBuf>,
    },

    /// Parse a number specification, e.g. "even no. 28-50, odd no."
    Rules { specification: String },

    /// Autocomplete a city name
    Cities { prefix: String },

    /// Autocomplete a street name within a city
    Streets { city: u32, prefix: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    config.registry_files.extend(cli.registry_files.iter().cloned());
    if let Some(encoding) = cli.encoding {
        config.registry_encoding = encoding;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }

    let registry = load_registry(&config.registry_files, config.registry_encoding, &Geographic)?;
    let processor = LineProcessor::from_config(Arc::new(registry), &config);

    match cli.command {
        Commands::Check { city, file, json } => {
            let text = read_input(file.as_ref())?;
            let conversion = processor.process_document(city, &text);
            if json {
                println!("{}", serde_json::to_string_pretty(&conversion)?);
            } else {
                for (line, note) in conversion.output.lines().zip(conversion.notes.lines()) {
                    if note.is_empty() {
                        println!("{}", line);
                    } else {
                        println!("{}    # {}", line, note);
                    }
                }
            }
        }
        Commands::Points { city, file } => {
            let text = read_input(file.as_ref())?;
            let groups = processor.group_points_by_marker(city, &text);
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        Commands::Rules { specification } => match processor.parse_rules(&specification) {
            Some(rules) => println!("{}", serde_json::to_string_pretty(&rules)?),
            None => {
                eprintln!("❌ Could not parse number specification: {}", specification);
                std::process::exit(1);
            }
        },
        Commands::Cities { prefix } => {
            for city in processor.registry().autocomplete_city(&prefix) {
                println!("{}\t{}", city.code, city.name);
            }
        }
        Commands::Streets { city, prefix } => {
            for street in processor.registry().autocomplete_street(city, &prefix) {
                println!("{}\t{}", street.code, street.name);
            }
        }
    }

    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
