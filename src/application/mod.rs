// Application layer - Use cases and repository seam
pub mod level1_service;
pub mod level2_service;
pub mod odin_repository;
pub mod statistics_service;

#[cfg(test)]
pub(crate) mod fake_repository;
