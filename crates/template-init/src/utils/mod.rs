pub mod child;
pub mod git;
pub mod log;
pub mod wizard;
