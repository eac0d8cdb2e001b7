pub mod prelude;

pub mod chirps;
pub mod follows;
pub mod users;
