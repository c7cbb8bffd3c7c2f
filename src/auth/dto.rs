use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::User;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestOtpRequest {
    pub email: String,
}

/// Sparse profile patch; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Public projection of a user; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub active: bool,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            active: user.active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct WorkerStatus {
    pub id: Uuid,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct StartWorkingResponse {
    pub message: String,
    pub user: WorkerStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signin_response_shape() {
        let response = SigninResponse {
            token: "tok".into(),
            user: PublicUser {
                id: Uuid::new_v4(),
                name: "Ann".into(),
                email: "ann@x.com".into(),
                active: false,
            },
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"token\""));
        assert!(json.contains("ann@x.com"));
        assert!(!json.contains("password"));
    }
}
