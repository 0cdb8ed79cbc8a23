pub mod candidates;
pub mod connection;
pub mod cvs;
pub mod jobs;
pub mod staff_users;

#[cfg(test)]
pub mod memory;

pub use candidates::CandidateRepository;
pub use cvs::CvRepository;
pub use jobs::JobRepository;
pub use staff_users::StaffUserRepository;
