//! Account and login handlers

pub mod login;
pub mod users;

pub use login::login;
pub use users::{create_user, get_user, list_users};
