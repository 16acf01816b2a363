//! Command-line driver: parse one schema and write it back out as
//! formatted schema text or as a JSON dump of the resolved AST.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use protop::{printer, Config, Proto};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protop")]
#[command(about = "Parse, resolve and order a proto3 schema", long_about = None)]
#[command(version)]
struct Cli {
    /// Schema file to parse
    #[arg(value_name = "SCHEMA")]
    schema: PathBuf,

    /// Files to write; `.json` outputs receive the AST, others the formatted schema
    #[arg(value_name = "OUTPUT")]
    outputs: Vec<PathBuf>,

    /// Print the JSON AST instead of the formatted schema when no output is given
    #[arg(long)]
    json: bool,

    /// Accept duplicate declarations, duplicate member names and non-message rpc types
    #[arg(long)]
    lenient: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = if cli.lenient {
        Config::lenient()
    } else {
        Config::default()
    };

    let text = fs::read_to_string(&cli.schema)
        .with_context(|| format!("failed to read '{}'", cli.schema.display()))?;
    let proto = protop::parse_with(&cli.schema.display().to_string(), &text, &config)
        .with_context(|| format!("failed to parse '{}'", cli.schema.display()))?;
    info!(
        messages = proto.declared_messages().len(),
        enums = proto.enums.len(),
        services = proto.services.len(),
        "parsed {}",
        cli.schema.display()
    );

    if cli.outputs.is_empty() {
        print!("{}", render(&proto, cli.json)?);
        return Ok(());
    }

    for output in &cli.outputs {
        let rendered = render(&proto, is_json(output))?;
        fs::write(output, rendered)
            .with_context(|| format!("failed to write '{}'", output.display()))?;
        info!("wrote {}", output.display());
    }
    Ok(())
}

fn render(proto: &Proto, json: bool) -> Result<String> {
    if json {
        let mut text = serde_json::to_string_pretty(proto).context("failed to serialize AST")?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(printer::print(proto))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}
