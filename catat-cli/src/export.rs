use anyhow::{Context, Result};
use catat_core::Entry;
use std::io::Write;
use std::path::Path;

/// Write entries as CSV: id,date,kind,description,amount,category
pub fn write_csv<W: Write>(entries: &[Entry], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for e in entries {
        wtr.serialize(e).context("write csv row")?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}

pub fn export_csv(entries: &[Entry], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(entries, file).with_context(|| format!("export to {}", path.display()))
}
