pub mod github_profile;
pub mod github_repository;
