mod process_transcript;

pub use process_transcript::*;
