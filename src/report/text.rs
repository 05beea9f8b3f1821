use crate::analyze::{OrgSummary, PeriodReport};
use crate::model::PullRequest;
use itertools::Itertools;

pub trait TextReport {
    fn render_text(&self) -> String;
}

impl TextReport for PeriodReport {
    fn render_text(&self) -> String {
        let headers = self.labels.iter().map(|l| l.to_string()).collect::<Vec<_>>();
        let key_width = self
            .buckets
            .keys()
            .map(|key| key.len())
            .chain([self.period.title().len()])
            .max()
            .unwrap_or_default();
        let widths = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.buckets
                    .values()
                    .filter_map(|counters| counters.get_index(index))
                    .map(|(_, count)| count.to_string().len())
                    .chain([header.len()])
                    .max()
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>();

        let header_row = headers
            .iter()
            .zip(widths.iter().copied())
            .map(|(header, width)| format!("{header:>width$}"))
            .join("  ");
        let mut lines = vec![format!("{:<key_width$}  {header_row}", self.period.title())];
        for (key, counters) in &self.buckets {
            let row = self
                .labels
                .iter()
                .zip(widths.iter().copied())
                .map(|(label, width)| {
                    let count = counters.get(label).copied().unwrap_or_default();
                    format!("{count:>width$}")
                })
                .join("  ");
            lines.push(format!("{key:<key_width$}  {row}"));
        }
        terminated(lines)
    }
}

impl TextReport for OrgSummary {
    fn render_text(&self) -> String {
        let mut lines = self
            .counts()
            .into_iter()
            .map(|(org, count)| format!("{org}: {count}"))
            .collect::<Vec<_>>();
        add_listing(&mut lines, "'Other' pull requests:", self.other());
        add_listing(&mut lines, "Unsigned authors:", self.unsigned());
        terminated(lines)
    }
}

fn add_listing(lines: &mut Vec<String>, header: &str, pulls: &[PullRequest]) {
    if pulls.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(header.to_string());
    lines.extend(pulls.iter().map(pull_line));
}

/// Every line, including the last, ends with a newline.
fn terminated(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

pub fn pull_line(pull: &PullRequest) -> String {
    format!("{:5} {:>17} {}", pull.number, pull.author_login, pull.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{Period, PeriodAggregator, PeriodOptions};
    use crate::model::{CombinedState, Intext};
    use chrono::{DateTime, TimeZone, Utc};

    fn pull(number: u64, org: Option<&str>, merged_at: DateTime<Utc>) -> PullRequest {
        PullRequest {
            number,
            title: format!("Improve thing {number}"),
            author_login: format!("dev{number}"),
            base_ref: "master".to_string(),
            state: CombinedState::Merged,
            intext: Intext::External,
            org: org.map(str::to_string),
            created_at: merged_at,
            merged_at: Some(merged_at),
            closed_at: Some(merged_at),
            lines: None,
        }
    }

    #[test]
    fn period_table_has_header_and_sorted_rows() {
        let mut aggregator = PeriodAggregator::new(PeriodOptions {
            period: Period::Quarter,
            start: PeriodOptions::default_start(),
            size_threshold: None,
            lines: false,
            closed: false,
        });
        let pulls = vec![
            pull(2, None, Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap()),
            pull(1, None, Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap()),
        ];
        aggregator.fold(&pulls).unwrap();
        let text = aggregator.report().render_text();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(
            lines[0],
            "quarter  opened internal  opened external  merged internal  merged external"
        );
        assert_eq!(
            lines[1],
            "2023-Q1                0                1                0                1"
        );
        assert!(lines[2].starts_with("2023-Q2"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn org_summary_lists_counts_then_other_pulls() {
        let at = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
        let mut summary = OrgSummary::new(None);
        let mut pulls = (1..=5).map(|n| pull(n, Some("acme"), at)).collect::<Vec<_>>();
        pulls.push(pull(6, None, at));
        pulls.push(pull(7, Some("other"), at));
        summary.fold(pulls);

        let text = summary.render_text();
        assert_eq!(
            text,
            "acme: 5\nother: 2\n\n'Other' pull requests:\n    6              dev6 Improve thing 6\n    7              dev7 Improve thing 7\n"
        );
    }

    #[test]
    fn unsigned_listing_has_its_own_header() {
        let at = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
        let mut summary = OrgSummary::new(None);
        summary.fold(vec![pull(12, Some("unsigned"), at)]);
        let text = summary.render_text();
        assert!(text.contains("\nUnsigned authors:\n   12             dev12 Improve thing 12\n"));
        assert!(!text.contains("'Other'"));
    }

    #[test]
    fn empty_summary_renders_nothing() {
        assert_eq!(OrgSummary::new(None).render_text(), "");
    }
}
