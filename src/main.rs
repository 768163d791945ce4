use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

use pot_ledger::csv::{read_script, write_settlements};
use pot_ledger::script::Runner;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "pot_ledger_results.json";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .expect("usage: pot-ledger <session.csv> [results.json]");
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let events = match read_script(&path) {
        Ok(events) => events,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let mut runner = Runner::new();
    runner.run(events.filter_map(|result| result.inspect_err(|e| warn!("{e}")).ok()));

    let record = runner.session().to_record();
    if record.net_totals.is_empty() {
        warn!("no games with winners were recorded, nothing to settle");
    }

    if let Err(e) = write_settlements(io::stdout().lock(), &record.settlements) {
        error!("failed to write settlements: {e}");
    }

    let saved = File::create(&output)
        .map_err(serde_json::Error::io)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &record)?;
            writer.flush().map_err(serde_json::Error::io)
        });
    match saved {
        Ok(()) => info!(output, "session data saved"),
        Err(e) => {
            error!(output, "failed to save session data: {e}");
            process::exit(1);
        }
    }
}
