pub(crate) mod auth_otp;
pub(crate) mod candidate_auth;
pub(crate) mod cv;
pub(crate) mod jobs;
pub(crate) mod staff_auth;
