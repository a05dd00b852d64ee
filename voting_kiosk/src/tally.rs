// ******** Output data structures *********

use crate::config::Candidate;
use crate::store::BallotStore;

/// The label of the void ballots, in the chart and in the exports.
pub const VOID_LABEL: &str = "Void";

pub const CSV_MIME_TYPE: &str = "text/csv";

/// One bar of the results chart.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ChartBar {
    pub label: String,
    pub value: u64,
}

/// One bar per candidate in the configured order, then the void ballots.
pub fn chart_series(candidates: &[Candidate], store: &BallotStore) -> Vec<ChartBar> {
    let mut bars: Vec<ChartBar> = candidates
        .iter()
        .map(|c| ChartBar {
            label: c.name.clone(),
            value: store.votes_for(&c.id).unwrap_or(0),
        })
        .collect();
    bars.push(ChartBar {
        label: VOID_LABEL.to_string(),
        value: store.void_votes(),
    });
    bars
}

/// The rows of the CSV export, header and total included.
pub fn csv_rows(candidates: &[Candidate], store: &BallotStore) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = vec![("Candidate".to_string(), "Votes".to_string())];
    for bar in chart_series(candidates, store) {
        rows.push((bar.label, bar.value.to_string()));
    }
    rows.push(("Total".to_string(), store.total_votes().to_string()));
    rows
}

/// The CSV export, one line per row, without a trailing newline.
///
/// Fields are not quoted: candidate names must not contain commas.
pub fn export_csv(candidates: &[Candidate], store: &BallotStore) -> String {
    csv_rows(candidates, store)
        .iter()
        .map(|(label, value)| format!("{},{}", label, value))
        .collect::<Vec<String>>()
        .join("\n")
}

/// The results are shown once something happened: a ballot was cast, the
/// voting was ended, or a voter authenticated during this run.
pub fn results_visible(store: &BallotStore, authenticated_once: bool) -> bool {
    authenticated_once || store.ended() || store.total_votes() > 0
}
