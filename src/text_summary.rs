//! Text summary builder for CLI output.
//!
//! Formats the human-readable lines printed by text mode after a draw.

use crate::model::DrawRecord;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary from a completed draw and the audience it was drawn from.
pub(crate) fn build_text_summary(record: &DrawRecord, entrants: &[String]) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!("Winner: {}", record.winner));
    lines.push(format!(
        "Entry: #{} of {}",
        record.index + 1,
        record.audience_size
    ));

    // Duplicate names are separate entries; show how many tickets the winner held.
    let tickets = entrants.iter().filter(|n| **n == record.winner).count();
    if tickets > 1 {
        lines.push(format!("Entries under this name: {tickets}"));
    }
    if !record.timestamp_utc.is_empty() {
        lines.push(format!("Drawn at: {}", record.timestamp_utc));
    }

    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(winner: &str, index: usize, size: usize) -> DrawRecord {
        DrawRecord {
            timestamp_utc: String::new(),
            winner: winner.into(),
            index,
            audience_size: size,
            draw_delay: Duration::from_secs(2),
            celebration: Duration::from_secs(7),
        }
    }

    #[test]
    fn summary_names_winner_and_position() {
        let entrants = vec!["Alice".to_string(), "Bob".to_string()];
        let summary = build_text_summary(&record("Bob", 1, 2), &entrants);
        assert_eq!(summary.lines, vec!["Winner: Bob", "Entry: #2 of 2"]);
    }

    #[test]
    fn summary_counts_duplicate_entries() {
        let entrants = vec!["Ann".to_string(), "Bo".to_string(), "Ann".to_string()];
        let summary = build_text_summary(&record("Ann", 2, 3), &entrants);
        assert!(summary
            .lines
            .contains(&"Entries under this name: 2".to_string()));
    }
}
