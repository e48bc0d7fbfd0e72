use common::{CreatePostRequest, PostDto};
use crate::api_client;

/// Search phrase worth sending, if any
pub fn normalize_phrase(search_phrase: Option<&str>) -> Option<&str> {
    search_phrase.map(str::trim).filter(|s| !s.is_empty())
}

/// Get the feed, newest first
pub async fn get_posts(search_phrase: Option<&str>) -> Result<Vec<PostDto>, String> {
    log::trace!("Fetching posts, search phrase: {:?}", search_phrase);
    let endpoint = match normalize_phrase(search_phrase) {
        Some(phrase) => format!("/posts?s={}", String::from(js_sys::encode_uri_component(phrase))),
        None => "/posts".to_string(),
    };

    let result: Result<Vec<PostDto>, String> = api_client::get(&endpoint).await;
    match &result {
        Ok(posts) => log::info!("Fetched {} posts", posts.len()),
        Err(e) => log::error!("Failed to fetch posts: {}", e),
    }
    result
}

/// Publish a post as the logged-in user
pub async fn create_post(request: CreatePostRequest) -> Result<PostDto, String> {
    log::debug!("Creating post: {}", request.title);
    let result: Result<PostDto, String> = api_client::post("/posts", &request).await;
    match &result {
        Ok(post) => log::info!("Created post with ID: {}", post.id),
        Err(e) => log::error!("Failed to create post: {}", e),
    }
    result
}
