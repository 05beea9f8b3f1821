pub mod bucket;
pub mod classifier;
pub mod labels;
pub mod org_summary;
pub mod period;

pub use bucket::Period;
pub use org_summary::OrgSummary;
pub use period::{PeriodAggregator, PeriodOptions, PeriodReport};
