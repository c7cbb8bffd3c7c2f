use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

use super::{
    dto::{
        MessageResponse, PublicUser, RequestOtpRequest, SigninRequest, SigninResponse,
        SignupRequest, SignupResponse, StartWorkingResponse, UpdateUserRequest,
        VerifyEmailRequest, WorkerStatus,
    },
    jwt::{AuthUser, JwtKeys},
    otp::{check_otp, generate_otp},
    password::{hash_password, verify_password},
    repo::User,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    payload.name = payload.name.trim().to_string();
    payload.email = payload.email.trim().to_string();

    if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Missing fields".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.name, &payload.email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created. Please sign in.".into(),
            email: user.email,
        }),
    ))
}

/// Issue a fresh verification code and hand it to the mailer. The previous
/// code, if any, is overwritten.
#[instrument(skip(state, payload))]
pub async fn request_otp(
    State(state): State<AppState>,
    Json(payload): Json<RequestOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if user.is_verified {
        return Ok(Json(MessageResponse {
            message: "Already verified".into(),
        }));
    }

    let code = generate_otp();
    let expires = OffsetDateTime::now_utc() + TimeDuration::minutes(state.config.otp_ttl_minutes);
    User::set_otp(&state.db, user.id, &code, expires)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    state.mailer.send_otp(&user.email, &code).await?;

    info!(user_id = %user.id, "otp issued");
    Ok(Json(MessageResponse {
        message: "OTP sent".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if user.is_verified {
        return Ok(Json(MessageResponse {
            message: "Already verified".into(),
        }));
    }

    check_otp(
        user.otp.as_deref(),
        user.otp_expires,
        &payload.otp,
        OffsetDateTime::now_utc(),
    )
    .map_err(|err| {
        warn!(user_id = %user.id, error = %err, "otp verification failed");
        err
    })?;

    User::mark_verified(&state.db, user.id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = %user.id, "email verified");
    Ok(Json(MessageResponse {
        message: "Email verified".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, ApiError> {
    // Unknown email and wrong password produce the same error so account
    // existence is not leaked.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "signin unknown email");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "signin invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user signed in");
    Ok(Json(SigninResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, patch))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    if requester != id {
        warn!(requester = %requester, target = %id, "profile update identity mismatch");
        return Err(ApiError::Forbidden);
    }

    let password_hash = match patch.password.as_deref() {
        Some(plain) => Some(hash_password(plain)?),
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        patch.name.as_deref(),
        patch.email.as_deref(),
        password_hash.as_deref(),
        patch.active,
    )
    .await?
    .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn start_working(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<StartWorkingResponse>, ApiError> {
    // The account can vanish between token issuance and this call.
    let user = User::set_active(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = %user.id, "started working");
    Ok(Json(StartWorkingResponse {
        message: "Started working".into(),
        user: WorkerStatus {
            id: user.id,
            active: user.active,
        },
    }))
}
