pub mod job_loader;

pub use job_loader::{expand_inputs, is_spreadsheet, load_job_manifest, JobManifest};
