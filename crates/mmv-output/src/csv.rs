//! CSV export backend.
//!
//! Creates two files in the configured output directory:
//! - `entity_frames.csv`
//! - `frame_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::FrameWriter;
use crate::{EntityRow, FrameSummaryRow, OutputResult};

/// Writes exported frames to two CSV files.
pub struct FrameCsvWriter {
    entities:  Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl FrameCsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut entities = Writer::from_path(dir.join("entity_frames.csv"))?;
        entities.write_record([
            "frame",
            "time",
            "kind",
            "id",
            "status",
            "latitude",
            "longitude",
            "attached_to",
            "passengers",
            "not_displayed_reason",
        ])?;

        let mut summaries = Writer::from_path(dir.join("frame_summaries.csv"))?;
        summaries.write_record(["frame", "real_ms", "time", "passengers", "vehicles", "stops", "not_displayed"])?;

        Ok(Self { entities, summaries, finished: false })
    }
}

impl FrameWriter for FrameCsvWriter {
    fn write_entities(&mut self, rows: &[EntityRow]) -> OutputResult<()> {
        for row in rows {
            self.entities.write_record(&[
                row.frame.to_string(),
                row.time.to_string(),
                row.kind.as_str().to_owned(),
                row.id.clone(),
                row.status.to_owned(),
                opt(row.latitude),
                opt(row.longitude),
                row.attached_to.clone().unwrap_or_default(),
                row.passengers.to_string(),
                row.not_displayed_reason.unwrap_or_default().to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &FrameSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.frame.to_string(),
            row.real_ms.to_string(),
            row.time.to_string(),
            row.passengers.to_string(),
            row.vehicles.to_string(),
            row.stops.to_string(),
            row.not_displayed.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.entities.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
