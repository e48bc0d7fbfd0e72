#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;
    use utoipa::openapi::{RefOr, schema::Schema};

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components should be generated");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            other => panic!("{} should be an object schema, got {:?}", name, other.is_some()),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        let components = openapi.components.as_ref().unwrap();
        for schema in ["ErrorResponse", "HealthResponse", "MeResponse", "UserDto", "PostDto", "NewPostRequest"] {
            assert!(components.schemas.contains_key(schema), "missing schema {}", schema);
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_documented_paths() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/api/v1/me"));
        assert!(paths.contains_key("/api/v1/users/{username}"));
        assert!(paths.contains_key("/api/v1/posts"));
        // Browser redirects are not part of the JSON API
        assert!(!paths.contains_key("/login/github"));
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field), "ErrorResponse lacks {}", field);
        }
    }

    #[test]
    fn test_user_schema_hides_private_fields() {
        let properties = object_properties("UserDto");

        assert!(properties.iter().any(|p| p == "username"));
        assert!(properties.iter().any(|p| p == "avatar_url"));
        assert!(!properties.iter().any(|p| p == "email"));
        assert!(!properties.iter().any(|p| p == "seen_welcome_modal"));
    }

    #[test]
    fn test_me_response_schema_structure() {
        let properties = object_properties("MeResponse");
        assert!(properties.iter().any(|p| p == "user"));
        assert!(properties.iter().any(|p| p == "login_enabled"));
    }
}
