pub mod queries;
pub mod setup;
