use sea_orm::entity::prelude::*;

/// A PairHub member, created on their first GitHub login.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// External identity id assigned by GitHub (`node_id`).
    #[sea_orm(unique)]
    pub user_id: String,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub github_url: String,
    pub email: Option<String>,
    /// Set once the welcome modal has been scheduled for this user.
    #[sea_orm(default_value = "false")]
    pub seen_welcome_modal: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Session,
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
