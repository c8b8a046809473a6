pub mod levels;

pub use levels::{split_levels, AnnotationRow, LevelSplit};
