mod process_transcript;

pub use process_transcript::{health_check, method_not_allowed, process_transcript};
