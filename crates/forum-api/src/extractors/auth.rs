//! Authentication extractors
//!
//! Extracts and validates JWT tokens from the Authorization header.
//! Endpoints open to guests use [`CurrentViewer`], which falls back to the
//! configured anonymous identity when no credentials are presented.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use forum_core::Snowflake;
use forum_service::Viewer;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the JWT token
    pub user_id: Snowflake,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }

    /// The viewer this user acts as
    pub fn viewer(&self) -> Viewer {
        Viewer::authenticated(self.user_id)
    }
}

fn validate_bearer(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = state.jwt_service().validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Invalid access token");
        ApiError::InvalidAuthFormat
    })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!(error = %e, "Invalid user ID in token");
        ApiError::InvalidAuthFormat
    })?;

    Ok(AuthUser::new(user_id))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        validate_bearer(&app_state, bearer.token())
    }
}

/// Viewer of the current request
///
/// With a valid bearer token this is the authenticated user; with no
/// Authorization header it is the anonymous viewer. A present but invalid
/// token is still rejected.
#[derive(Debug, Clone)]
pub struct CurrentViewer(pub Viewer);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentViewer
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let auth = validate_bearer(&app_state, bearer.token())?;
                Ok(CurrentViewer(auth.viewer()))
            }
            Err(_) => Ok(CurrentViewer(app_state.anonymous_viewer())),
        }
    }
}
