mod logging;
mod multi_progress;
mod progress_style;

pub use logging::init_logging;
pub use multi_progress::{multi_progress, MultiProgressNew};
pub use progress_style::ProgressStyleTemplate;
