pub mod additional;
pub mod dates;
pub mod export;
pub mod handlers;
pub mod normalizer;
pub mod readiness;
pub mod session;
pub mod skills;
