use serde::{ Serialize, Deserialize };

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_decodes_tokens_and_user() {
        let raw = r#"{
            "success": true,
            "message": "Login successful",
            "user": {
                "id": "u1",
                "email": "a@b.io",
                "username": "ana",
                "createdAt": "2025-01-01T00:00:00.000Z",
                "updatedAt": "2025-01-01T00:00:00.000Z"
            },
            "accessToken": "at",
            "refreshToken": "rt"
        }"#;
        let resp: AuthResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.success);
        assert_eq!(resp.user.unwrap().username, "ana");
        assert_eq!(resp.access_token.as_deref(), Some("at"));
        assert_eq!(resp.refresh_token.as_deref(), Some("rt"));
    }
}
