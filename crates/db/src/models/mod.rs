pub mod completion;
pub mod project;
pub mod upload;
