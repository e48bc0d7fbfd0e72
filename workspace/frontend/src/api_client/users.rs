use common::UserDto;
use crate::api_client;

/// Get a public profile by GitHub username
pub async fn get_user(username: &str) -> Result<UserDto, String> {
    log::trace!("Fetching user {}", username);
    let result = api_client::get(&format!("/users/{}", username)).await;
    if let Err(e) = &result {
        log::error!("Failed to fetch user {}: {}", username, e);
    }
    result
}
