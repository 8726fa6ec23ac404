pub mod outcome;
pub mod payload;
pub mod recap;
pub mod render;
pub mod report;
pub mod scanner;

pub use scanner::{parse_transcript, Phase, Scanner};
