use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    // GitHub node_id, the only uniqueness guarantee on a user
                    .col(string(Users::UserId).unique_key())
                    .col(string(Users::Username))
                    .col(string_null(Users::Name))
                    .col(text_null(Users::Bio))
                    .col(string(Users::AvatarUrl))
                    .col(string(Users::GithubUrl))
                    .col(string_null(Users::Email))
                    .col(boolean(Users::SeenWelcomeModal).default(false))
                    .col(
                        timestamp_with_time_zone(Users::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    UserId,
    Username,
    Name,
    Bio,
    AvatarUrl,
    GithubUrl,
    Email,
    SeenWelcomeModal,
    CreatedAt,
}
