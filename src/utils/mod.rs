pub mod external_tools;
pub mod fasta;
pub(crate) mod progress_bar_builder;

pub use external_tools::{collect_read_stats, ReadStatsTool};
pub use fasta::open_fasta;
