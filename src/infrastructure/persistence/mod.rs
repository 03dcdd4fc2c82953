pub mod batch_repo_impl;
pub mod facility_repo_impl;
