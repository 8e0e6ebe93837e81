//! CSV export of frags

use crate::{Event, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Write one CSV record per frag
///
/// Kills produce `time,killer,victim,weapon`; suicides produce
/// `time,killer`. Times are RFC 3339. There is no header row.
pub fn write_csv<W: Write>(writer: W, events: &[Event]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);

    for event in events {
        let time = event.time().to_rfc3339();
        match event {
            Event::Kill {
                killer,
                victim,
                weapon,
                ..
            } => csv.write_record([
                time.as_str(),
                killer.as_str(),
                victim.as_str(),
                weapon.as_str(),
            ])?,
            Event::Suicide { killer, .. } => csv.write_record([time.as_str(), killer.as_str()])?,
        }
    }

    csv.flush()?;
    debug!("Wrote {} CSV records", events.len());
    Ok(())
}

/// Write frags to a CSV file, creating parent directories as needed
pub fn write_csv_file<P: AsRef<Path>>(path: P, events: &[Event]) -> Result<()> {
    let path = path.as_ref();
    info!("Exporting {} frags to {}", events.len(), path.display());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), events)
}
