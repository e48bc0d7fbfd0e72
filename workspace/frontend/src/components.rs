pub mod layout;
pub mod modals;
pub mod navbar;
pub mod posts;
pub mod profile_area;
pub mod sidebar;
