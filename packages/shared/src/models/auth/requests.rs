use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_defaults_to_non_admin() {
        let json = r#"{"email":"a@example.com","password":"secret123","username":"a"}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.email, "a@example.com");
        assert!(!request.is_admin);
    }

    #[test]
    fn test_register_request_reads_is_admin() {
        let json = r#"{"email":"b@example.com","password":"secret123","username":"b","isAdmin":true}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();

        assert!(request.is_admin);
    }

    #[test]
    fn test_update_user_request_fields_are_optional() {
        let request: UpdateUserRequest = serde_json::from_str(r#"{"username":"new"}"#).unwrap();

        assert_eq!(request.username.as_deref(), Some("new"));
        assert!(request.email.is_none());
    }
}
