pub mod batch_runner;
pub mod outcome;
pub mod processor;

pub use batch_runner::BatchRunner;
pub use outcome::{BasinError, BasinOutcome, BatchReport, FileOutcome, SkipReason};
pub use processor::{AreaSettings, BasinRun};
