use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use tracing::warn;
use wellness_check::config::AppConfig;
use wellness_check::{load_bank, read_bulk, telemetry, Error};

/// Scores a CSV export of assessments, one respondent per row.
#[derive(Parser)]
struct Args {
    path: String,

    /// Print each row as a JSON object instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config)?;

    let bank = load_bank(&config)?;
    let reader = BufReader::new(File::open(&args.path)?);
    for (line, row) in read_bulk(&bank, config.engine, reader).enumerate() {
        match row {
            Ok(row) if args.json => {
                let value = serde_json::json!({
                    "respondent": row.respondent,
                    "categories": row.selection,
                    "results": row.result,
                });
                println!("{}", value);
            }
            Ok(row) => {
                let scores = row
                    .result
                    .iter()
                    .map(|(tag, score)| format!("{}={}% ({})", tag, score.percentage, score.rating()))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("id = {}, {}", row.respondent, scores);
            }
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping row");
            }
        }
    }
    Ok(())
}
