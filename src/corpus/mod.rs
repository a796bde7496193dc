//! Corpus command handlers.

pub mod generate;
pub mod verify;
pub mod writer;

pub use generate::{format_summary, generate_to_files, run_generate, CorpusPaths, GenerateOutcome};
pub use verify::{run_verify, verify_files};
pub use writer::{prepare_corpus, write_corpus, PreparedCorpus, WriteMetrics};
