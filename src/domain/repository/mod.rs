pub mod batch_repository;
pub mod facility_repository;
