//! SeaORM entities for PairHub: members, their login sessions and the
//! pairing requests they post.

pub mod post;
pub mod session;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::post::Entity as Post;
    pub use super::session::Entity as Session;
    pub use super::user::Entity as User;
}
