pub mod cancellation;
pub mod file_flow;
pub mod progress;

pub use cancellation::CancellationFlag;
pub use file_flow::FileFlow;
pub use progress::ProgressTracker;
