//! Lagasafn Annotate
//!
//! Reads a law payload (the law tree plus its footnotes) as JSON, runs the
//! annotation pass and writes the annotated law and its footnote blocks as
//! HTML to stdout.
//!
//! Usage: `lagasafn-annotate [PAYLOAD.json]` (stdin when no path is given)

use anyhow::Context;
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lagasafn_annotate::{Config, DiagnosticRecord, Engine, LawDocument};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let document = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Reading payload from {}", path);
            let file = File::open(&path).with_context(|| format!("Failed to open {}", path))?;
            LawDocument::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to decode {}", path))?
        }
        None => LawDocument::from_reader(io::stdin().lock()).context("Failed to decode stdin")?,
    };

    let engine = Engine::new(config.engine);
    let law = engine.annotate(document).context("Annotation failed")?;

    if !law.diagnostics.is_empty() {
        let records: Vec<DiagnosticRecord> = law.diagnostics.iter().map(DiagnosticRecord::from).collect();
        tracing::warn!(
            "{} location(s) not placed as recorded: {}",
            records.len(),
            serde_json::to_string(&records)?
        );
    }

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", law.to_html())?;
    writeln!(stdout, "{}", law.footnotes_html())?;
    Ok(())
}
