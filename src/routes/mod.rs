pub mod auth_otp_routes;
pub mod candidate;
pub mod cv;
pub mod jobs;
pub mod staff;
