mod create_user;
mod init;
mod serve;
mod timeline;
mod users;

pub use create_user::{CreateUserArgs, cmd_create_user};
pub use init::cmd_init;
pub use serve::cmd_serve;
pub use timeline::cmd_timeline;
pub use users::cmd_list_users;
