pub mod client;
pub mod upload;
