pub mod query;
pub mod sketch_repository;
