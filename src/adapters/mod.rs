pub mod api_errors;
pub mod handlers;
pub mod paypal_client;
