use super::user;
use sea_orm::entity::prelude::*;

/// Server-side session state keyed by the id carried in the session cookie.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Internal id of the logged-in user, `None` for an anonymous session.
    pub user_id: Option<i32>,
    pub expires_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Whether the session is past its expiry at `now`.
    pub fn is_expired(&self, now: DateTimeUtc) -> bool {
        self.expires_at <= now
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
