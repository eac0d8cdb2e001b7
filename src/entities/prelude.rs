pub use super::chirps::Entity as Chirps;
pub use super::users::Entity as Users;
