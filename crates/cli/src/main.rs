use clap::{Parser, Subcommand};
use std::path::PathBuf;

use hpr_core::{stats, CoreConfig, HprResult, PatientStore, RecordFilter, DEFAULT_PATIENT_DATA_DIR};

mod seed;

#[derive(Parser)]
#[command(name = "hpr")]
#[command(about = "HPR patient record system CLI")]
struct Cli {
    /// Patient data directory (falls back to PATIENT_DATA_DIR, then the default)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patient records
    List,
    /// Print the statistics summary as JSON
    Stats,
    /// Populate the store with demo admissions
    Seed {
        /// How many records to create
        #[arg(long, default_value_t = 30)]
        count: usize,
    },
}

fn open_store(data_dir: Option<PathBuf>) -> HprResult<PatientStore> {
    let dir = data_dir
        .or_else(|| std::env::var("PATIENT_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PATIENT_DATA_DIR));
    PatientStore::open(&CoreConfig::new(dir))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => {
            let store = open_store(cli.data_dir)?;
            let records = store.list(&RecordFilter::default())?;
            if records.is_empty() {
                println!("No patients found.");
            } else {
                for record in records {
                    println!(
                        "AN: {}, Name: {}, Status: {}, ID: {}",
                        record.an,
                        record.name,
                        record.status(),
                        record.id
                    );
                }
            }
        }
        Some(Commands::Stats) => {
            let store = open_store(cli.data_dir)?;
            let records = store.list(&RecordFilter::default())?;
            let report = stats::compute(&records, chrono::Utc::now());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(Commands::Seed { count }) => {
            let store = open_store(cli.data_dir)?;
            match seed::seed(&store, count) {
                Ok(created) => println!("Seeded {created} of {count} records"),
                Err(e) => eprintln!("Error seeding records: {e}"),
            }
        }
        None => {
            println!("Use 'hpr --help' for commands");
        }
    }

    Ok(())
}
