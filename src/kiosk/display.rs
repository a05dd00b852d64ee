// Text rendering of the kiosk for the console.

use crate::kiosk::*;

const CHART_WIDTH: u128 = 40;

/// A horizontal bar chart. Bars are scaled to the largest value; a non-zero
/// value always gets at least one mark.
pub fn render_chart(bars: &[ChartBar]) -> String {
    let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    let max_value = bars.iter().map(|b| b.value).max().unwrap_or(0);
    let mut lines: Vec<String> = Vec::new();
    for bar in bars {
        let len = if max_value == 0 {
            0
        } else {
            // In u128: counts may be as large as u64::MAX.
            ((u128::from(bar.value) * CHART_WIDTH) / u128::from(max_value))
                .max(u128::from(bar.value > 0))
        };
        lines.push(format!(
            "  {:<width$} | {} {}",
            bar.label,
            "#".repeat(len as usize),
            bar.value,
            width = label_width
        ));
    }
    lines.join("\n")
}

/// The results panel: total, one count per candidate, void ballots, chart.
pub fn render_results(candidates: &[Candidate], store: &BallotStore) -> String {
    let mut s = String::from("Voting Results\n");
    s.push_str(&format!("  Total: {}\n", store.total_votes()));
    for c in candidates {
        s.push_str(&format!(
            "  {}: {}\n",
            c.name,
            store.votes_for(&c.id).unwrap_or(0)
        ));
    }
    s.push_str(&format!("  {}: {}\n\n", VOID_LABEL, store.void_votes()));
    s.push_str(&render_chart(&chart_series(candidates, store)));
    s
}

/// The choices offered to an authenticated voter.
pub fn render_ballot(candidates: &[Candidate]) -> String {
    let mut lines: Vec<String> = vec!["Click on your preferred party logo to vote".to_string()];
    for c in candidates {
        lines.push(format!("  vote {:<12} {} [{}]", c.id, c.name, c.logo_ref));
    }
    lines.push(format!("  void {:<12} Void Vote", ""));
    lines.join("\n")
}

pub fn render_credential(credential: &Credential) -> String {
    format!(
        "National Identification Number: {}\nDate of birth: {}",
        credential.identifier, credential.secret
    )
}

pub fn render_status<P: Persistence>(kiosk: &Kiosk<P>) -> String {
    let voting = if kiosk.store().ended() {
        "ended"
    } else {
        "open"
    };
    let session = match kiosk.session().current_credential() {
        Some(c) => format!("Unlocked\n{}", render_credential(c)),
        None => "Enter Credentials to Vote".to_string(),
    };
    format!(
        "Voting: {}\nBallots cast: {}\nCredentials used: {}\nSession: {}",
        voting,
        kiosk.store().total_votes(),
        kiosk.store().used_credentials().len(),
        session
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(label: &str, value: u64) -> ChartBar {
        ChartBar {
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn chart_scaling() {
        let chart = render_chart(&[bar("APC", 80), bar("LP", 1), bar("Void", 0)]);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("  APC  | {} 80", "#".repeat(40)));
        assert_eq!(lines[1], "  LP   | # 1");
        assert_eq!(lines[2], "  Void |  0");
    }

    #[test]
    fn chart_with_huge_counts() {
        let chart = render_chart(&[bar("A", u64::MAX), bar("B", u64::MAX / 2)]);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], format!("  A | {} {}", "#".repeat(40), u64::MAX));
        assert_eq!(lines[1], format!("  B | {} {}", "#".repeat(19), u64::MAX / 2));
    }

    #[test]
    fn empty_chart() {
        let chart = render_chart(&[bar("A", 0), bar("Void", 0)]);
        assert_eq!(chart, "  A    |  0\n  Void |  0");
    }

    #[test]
    fn results_panel() {
        let candidates = vec![Candidate::new("a", "Alpha", ""), Candidate::new("b", "Bravo", "")];
        let store = BallotStore::fresh(&candidates);
        let panel = render_results(&candidates, &store);
        assert!(panel.starts_with("Voting Results\n  Total: 0\n  Alpha: 0\n  Bravo: 0\n  Void: 0\n"));
    }
}
