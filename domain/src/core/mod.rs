pub mod credentials;
pub mod error;
pub mod provider;
pub mod question;
