//! CSV export of a strike summary

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer as CsvWriter;

use crate::analytics::StrikeSummary;
use crate::core::ScannerResult;

/// Column set of an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvLayout {
    /// Strike, CALL OI, PUT OI
    #[default]
    Basic,
    /// Basic plus volume, delta and theta per side
    Extended,
}

impl CsvLayout {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            CsvLayout::Basic => &["Strike", "CALL OI", "PUT OI"],
            CsvLayout::Extended => &[
                "Strike",
                "CALL OI",
                "PUT OI",
                "CALL Volume",
                "PUT Volume",
                "CALL Delta",
                "PUT Delta",
                "CALL Theta",
                "PUT Theta",
            ],
        }
    }
}

/// File name used by the export: `{TICKER}_options_data.csv`
pub fn default_csv_name(ticker: &str) -> String {
    format!("{}_options_data.csv", ticker.trim().to_uppercase())
}

/// Write `summary` as CSV, one row per strike in ascending order
pub fn write_csv<W: Write>(summary: &StrikeSummary, writer: W, layout: CsvLayout) -> ScannerResult<()> {
    let mut wtr = CsvWriter::from_writer(writer);
    wtr.write_record(layout.header())?;

    for (strike, entry) in summary.iter() {
        let mut row = vec![
            strike.to_string(),
            entry.call.open_interest.to_string(),
            entry.put.open_interest.to_string(),
        ];

        if layout == CsvLayout::Extended {
            row.extend([
                entry.call.volume.to_string(),
                entry.put.volume.to_string(),
                entry.call.delta.to_string(),
                entry.put.delta.to_string(),
                entry.call.theta.to_string(),
                entry.put.theta.to_string(),
            ]);
        }

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `summary` to a CSV file at `path`
pub fn export_csv(summary: &StrikeSummary, path: impl AsRef<Path>, layout: CsvLayout) -> ScannerResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(summary, file, layout)?;

    tracing::info!("Exported {} strikes to {:?}", summary.len(), path);
    Ok(())
}
