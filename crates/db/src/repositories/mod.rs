pub mod completion_repo;
pub mod project_repo;
pub mod upload_repo;

pub use completion_repo::CompletionRepo;
pub use project_repo::ProjectRepo;
pub use upload_repo::UploadRepo;
