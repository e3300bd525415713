use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::User;

/// Request body for `POST /api/v1/users`. Missing fields deserialize as empty
/// strings so they surface as validation errors rather than parse errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CreateUserRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self
    }
}

/// Request body for `PUT /api/v1/users/:id`. Absent and empty fields mean "no change".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn normalized(self) -> Self {
        Self {
            name: self
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            email: self
                .email
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty()),
        }
    }
}

/// Outward view of a user; the password hash has no field here.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn user_response_never_carries_the_hash() {
        let user = User {
            id: 7,
            name: "Ann".into(),
            email: "ann@x.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: datetime!(2024-01-02 03:04:05 UTC),
            updated_at: datetime!(2024-01-02 03:04:05 UTC),
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["created_at"], "2024-01-02T03:04:05Z");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let req: CreateUserRequest = serde_json::from_str(r#"{"name":"Ann"}"#).unwrap();
        assert_eq!(req.name, "Ann");
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        let req = CreateUserRequest {
            name: "  Ann ".into(),
            email: " Ann@X.com ".into(),
            password: " secret1 ".into(),
        }
        .normalized();
        assert_eq!(req.name, "Ann");
        assert_eq!(req.email, "ann@x.com");
        assert_eq!(req.password, " secret1 ");
    }

    #[test]
    fn empty_update_fields_become_absent() {
        let req = UpdateUserRequest {
            name: Some("".into()),
            email: Some("  ".into()),
        }
        .normalized();
        assert!(req.name.is_none());
        assert!(req.email.is_none());
    }
}
