use chrono::{DateTime, Datelike, Utc};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Period {
    Week,
    Month,
    Quarter,
}

impl Period {
    pub fn bucket(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            Period::Week => week_bucket(datetime),
            Period::Month => month_bucket(datetime),
            Period::Quarter => quarter_bucket(datetime),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
        }
    }
}

/// ISO week, keyed by the ISO week-numbering year.
pub fn week_bucket(datetime: &DateTime<Utc>) -> String {
    let week = datetime.iso_week();
    format!("{:04}-W{:02}", week.year(), week.week())
}

pub fn month_bucket(datetime: &DateTime<Utc>) -> String {
    format!("{:04}-{:02}", datetime.year(), datetime.month())
}

pub fn quarter_bucket(datetime: &DateTime<Utc>) -> String {
    format!("{:04}-Q{}", datetime.year(), (datetime.month() - 1) / 3 + 1)
}
