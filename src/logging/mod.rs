//! Structured console and file logging.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, SummaryCounts, TaskEntry, TaskStatus};
