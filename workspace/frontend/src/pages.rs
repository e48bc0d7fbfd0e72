pub mod index;
pub mod not_found;
pub mod profile;
