use common::MeResponse;
use crate::api_client;

/// Who is logged in, and whether login is available at all
pub async fn get_me() -> Result<MeResponse, String> {
    log::trace!("Fetching current user");
    let result: Result<MeResponse, String> = api_client::get("/me").await;
    if let Ok(me) = &result {
        match &me.user {
            Some(user) => log::info!("Logged in as {}", user.username),
            None => log::debug!("Anonymous visitor (login enabled: {})", me.login_enabled),
        }
    }
    result
}
