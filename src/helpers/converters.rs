use common::{PostDto, UserDto};
use model::entities::{post, user};

/// Public projection of a user record; email and flags stay server-side.
pub fn user_to_dto(model: user::Model) -> UserDto {
    UserDto {
        id: model.id,
        username: model.username,
        name: model.name,
        bio: model.bio,
        avatar_url: model.avatar_url,
        github_url: model.github_url,
    }
}

pub fn post_to_dto(model: post::Model, author: user::Model) -> PostDto {
    PostDto {
        id: model.id,
        title: model.title,
        body: model.body,
        created_at: model.created_at,
        author: user_to_dto(author),
    }
}
