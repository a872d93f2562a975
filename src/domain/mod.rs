pub mod capture;
pub mod credentials;
pub mod error;
pub mod mode;
pub mod order;
pub mod provider;
pub mod token;
