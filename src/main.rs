use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use pstruct::{DurabilityMode, FileStore, FileStoreConfig, Format, PersistentRecord, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pstruct")]
#[command(about = "Inspect and edit write-through record files")]
struct Cli {
    /// Record file to operate on
    #[arg(long, short)]
    file: PathBuf,

    /// Storage format; inferred from the file extension when omitted
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// fsync every write before it replaces the file
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every field as JSON
    Show,
    /// Print one field as JSON
    Get { name: String },
    /// Set a field; VALUE is parsed as JSON, or taken as a plain string
    Set { name: String, value: String },
    /// Delete a field
    Delete { name: String },
    /// List field names
    Keys,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
    Msgpack,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Format::Json,
            FormatArg::Yaml => Format::Yaml,
            FormatArg::Msgpack => Format::MessagePack,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let format = cli
        .format
        .map(Format::from)
        .unwrap_or_else(|| Format::from_path(&cli.file));
    let durability = if cli.sync {
        DurabilityMode::Sync
    } else {
        DurabilityMode::Async
    };
    let store = FileStore::with_config(FileStoreConfig::new().durability(durability));

    let mut record = PersistentRecord::open_with(&cli.file, format, store)
        .with_context(|| format!("Failed to open record '{}'", cli.file.display()))?;

    match cli.command {
        Command::Show => {
            println!("{}", serde_json::to_string_pretty(record.fields())?);
        }
        Command::Get { name } => {
            let value = record
                .get(&name)
                .ok_or_else(|| anyhow!("Field '{}' is not set", name))?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Command::Set { name, value } => {
            let value = parse_value(&value);
            record
                .set(name.as_str(), value)
                .with_context(|| format!("Failed to set '{}'", name))?;
        }
        Command::Delete { name } => {
            record
                .delete(&name)
                .with_context(|| format!("Failed to delete '{}'", name))?;
        }
        Command::Keys => {
            for name in record.keys() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
