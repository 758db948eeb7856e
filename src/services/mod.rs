pub mod event_sink;
pub mod filename_finalizer;
pub mod output_naming;
pub mod permission;
pub mod report_writer;

pub use event_sink::{
    event_channel, log_info, log_warn, ChannelSink, ConversionEvent, EventSink, EventStream,
};
pub use filename_finalizer::finalize_outputs;
pub use output_naming::{
    decode_os_spaces, decode_spaces, derive_output_path, derive_pdf_name, derive_pdf_os_name,
    normalize_path,
};
pub use permission::ensure_writable;
pub use report_writer::ReportWriter;
