pub mod audio;
pub mod catalog;
pub mod config;
pub mod drill;
pub mod note;
pub mod question;
pub mod session;
pub mod tuning;

// Utility modules
pub mod ratio;
