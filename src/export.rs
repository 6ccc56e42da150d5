//! Flat CSV export of a ranked pick list.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::ExportError;
use crate::pick_list::AllianceCandidate;

/// One exported row. Rates are rounded to one decimal, complementarity to a whole number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub rank: usize,
    pub team: u32,
    pub pick_score: String,
    pub aggregate_rate: String,
    pub auto_rate: String,
    pub teleop_rate: String,
    pub complementary: String,
    pub consistency: String,
    pub event_win_percent: String,
}

impl From<&AllianceCandidate> for ExportRow {
    fn from(c: &AllianceCandidate) -> Self {
        ExportRow {
            rank: c.pick_order,
            team: c.team.id,
            pick_score: format!("{:.1}", c.pick_score),
            aggregate_rate: format!("{:.1}", c.team.aggregate_rate),
            auto_rate: format!("{:.1}", c.team.auto_rate),
            teleop_rate: format!("{:.1}", c.team.teleop_rate),
            complementary: format!("{:.0}", c.complementary),
            consistency: format!("{:.1}", c.team.consistency),
            event_win_percent: format!("{:.1}", c.event_win_percent),
        }
    }
}

const HEADER: [&str; 9] = [
    "rank",
    "team",
    "pick_score",
    "aggregate_rate",
    "auto_rate",
    "teleop_rate",
    "complementary",
    "consistency",
    "event_win_percent",
];

/// Write `candidates` ordered by rank ascending, whatever order they arrive in.
/// Ranks are the assigned `pick_order`, so a filtered subset keeps its gaps.
/// An empty slice writes only the header.
pub fn write_csv<W: Write>(candidates: &[AllianceCandidate], writer: W) -> Result<(), ExportError> {
    let mut rows: Vec<ExportRow> = candidates.iter().map(ExportRow::from).collect();
    rows.sort_by_key(|r| r.rank);

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    tracing::debug!(rows = candidates.len(), "exported pick list");
    Ok(())
}

pub fn to_csv_string(candidates: &[AllianceCandidate]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(candidates, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parse exported rows back.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ExportRow>, ExportError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr.deserialize().collect::<Result<Vec<ExportRow>, _>>()?;
    Ok(rows)
}

/// `(rank, team)` for every exported row, in file order.
pub fn read_ranks<R: Read>(reader: R) -> Result<Vec<(usize, u32)>, ExportError> {
    Ok(read_rows(reader)?.into_iter().map(|r| (r.rank, r.team)).collect())
}
