pub mod client;
pub mod completion;
pub mod config;
pub mod errors;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod routes;
