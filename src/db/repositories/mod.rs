pub mod chirp;
pub mod follow;
pub mod user;
