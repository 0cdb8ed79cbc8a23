pub mod candidate;
pub mod cv;
pub mod job;
pub mod otp;
pub mod user;
