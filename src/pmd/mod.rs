pub mod file;
pub mod report;
pub mod violation;

pub use file::AnalyzedFile;
