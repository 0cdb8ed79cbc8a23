pub mod email_service;
pub mod otp_service;
pub mod password;
pub mod pending_store;
pub mod token_service;
