pub mod current_user;
pub mod error;
pub mod fetch_hook;
pub mod loading;
pub mod toast;
