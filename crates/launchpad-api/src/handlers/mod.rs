pub mod auth;
pub mod files;
pub mod pages;
pub mod uploads;
