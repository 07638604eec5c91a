use super::CommandContext;
use crate::cli::HistoryArgs;
use crate::config::builder;
use crate::error::{CliError, Result};
use crate::store::{self, StoredRecord};
use protwin::core::io::report::ReportFormat;
use std::io::Write;
use tracing::info;

pub async fn run(args: HistoryArgs, ctx: &CommandContext) -> Result<()> {
    let store_settings = builder::store_settings(&ctx.file, &ctx.defaults)?;
    let mut store = store::open(&store_settings)?;

    if args.clear {
        let removed = store.clear()?;
        println!("Removed {} stored result(s).", removed);
        return Ok(());
    }

    let format = match args.format.as_deref() {
        Some(name) => name.parse::<ReportFormat>().map_err(CliError::Config)?,
        None => ReportFormat::Text,
    };
    let records = store.history(args.id.as_deref());
    info!("Listing {} stored result(s).", records.len());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_history(&records, format, &mut out)
}

fn write_history(records: &[&StoredRecord], format: ReportFormat, out: &mut impl Write) -> Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records)
                .map_err(|e| CliError::Other(e.into()))?;
            writeln!(out)?;
        }
        ReportFormat::Csv => {
            writeln!(out, "id,sequence_id,created_at,tipo")?;
            for r in records {
                writeln!(out, "{},{},{},{}", r.id, r.sequence_id, r.created_at.to_rfc3339(), r.payload.kind())?;
            }
        }
        ReportFormat::Text => {
            if records.is_empty() {
                writeln!(out, "No stored results.")?;
            }
            for r in records {
                writeln!(
                    out,
                    "{}  {:<12} {}  {}",
                    r.created_at.format("%Y-%m-%d %H:%M:%S"),
                    r.payload.kind(),
                    r.sequence_id,
                    r.id
                )?;
            }
        }
    }
    Ok(())
}
