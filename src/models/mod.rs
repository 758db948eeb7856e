pub mod job;
pub mod loaders;
pub mod result;

pub use job::{BackoffStrategy, ConversionJob, RetryPolicy, DEFAULT_RETRY_BACKOFF, DEFAULT_RETRY_LIMIT};
pub use loaders::{expand_inputs, load_job_manifest, JobManifest};
pub use result::{
    CompletionStatus, ConversionStatus, FileConversionResult, JobReport, RenameOutcome,
};
