use crate::analyze::bucket::Period;
use crate::analyze::classifier::{classify_intext, classify_size, excluded_by_ref, lines_in_pull};
use crate::analyze::labels::{blank_counters, label_set, Counters, Event, Label};
use crate::model::{CombinedState, DetailLevel, Error, PullRequest, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PeriodOptions {
    pub period: Period,
    pub start: DateTime<Utc>,
    /// Split counts into small/large at this many changed lines.
    pub size_threshold: Option<u64>,
    /// Sum changed lines instead of counting pulls.
    pub lines: bool,
    pub closed: bool,
}

impl PeriodOptions {
    /// Far enough back to behave like "no start".
    pub fn default_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn detail_level(&self) -> DetailLevel {
        if self.size_threshold.is_some() || self.lines {
            DetailLevel::Full
        } else {
            DetailLevel::List
        }
    }
}

pub struct PeriodAggregator {
    options: PeriodOptions,
    labels: Vec<Label>,
    blank: Counters,
    buckets: BTreeMap<String, Counters>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReport {
    pub period: Period,
    pub labels: Vec<Label>,
    pub buckets: BTreeMap<String, Counters>,
}

impl PeriodAggregator {
    pub fn new(options: PeriodOptions) -> Self {
        let labels = label_set(options.size_threshold.is_some(), options.closed);
        let blank = blank_counters(&labels);
        Self {
            options,
            labels,
            blank,
            buckets: BTreeMap::new(),
        }
    }

    pub fn fold<'a>(&mut self, pulls: impl IntoIterator<Item = &'a PullRequest>) -> Result<()> {
        for pull in pulls {
            self.insert(pull)?;
        }
        Ok(())
    }

    pub fn insert(&mut self, pull: &PullRequest) -> Result<()> {
        if excluded_by_ref(pull) {
            debug!(number = pull.number, base_ref = %pull.base_ref, "Ignoring release pull request");
            return Ok(());
        }

        let increment = if self.options.lines {
            lines_in_pull(pull)
        } else {
            1
        };
        let start = self.options.start;

        if pull.created_at >= start {
            self.count(Event::Opened, pull, &pull.created_at, increment)?;
        }
        match (pull.state, pull.merged_at, pull.closed_at) {
            (CombinedState::Merged, Some(merged_at), _) => {
                if merged_at >= start {
                    self.count(Event::Merged, pull, &merged_at, increment)?;
                }
            }
            (CombinedState::Closed, _, Some(closed_at)) if self.options.closed => {
                if closed_at >= start {
                    self.count(Event::Closed, pull, &closed_at, increment)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn count(
        &mut self,
        event: Event,
        pull: &PullRequest,
        at: &DateTime<Utc>,
        increment: u64,
    ) -> Result<()> {
        let label = Label {
            event,
            intext: classify_intext(pull),
            size: self
                .options
                .size_threshold
                .map(|threshold| classify_size(pull, threshold)),
        };
        let key = self.options.period.bucket(at);
        let counters = self.bucket_mut(key);
        let Some(counter) = counters.get_mut(&label) else {
            return Err(Error::UnknownLabel(label.to_string()));
        };
        *counter += increment;
        Ok(())
    }

    fn bucket_mut(&mut self, key: String) -> &mut Counters {
        let blank = &self.blank;
        self.buckets.entry(key).or_insert_with(|| blank.clone())
    }

    pub fn report(self) -> PeriodReport {
        PeriodReport {
            period: self.options.period,
            labels: self.labels,
            buckets: self.buckets,
        }
    }
}
