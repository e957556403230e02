//! Caller identity.
//!
//! Credentials are verified upstream; the core only consumes the resulting
//! identity through an [`Authenticator`].

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::domain::Identity;
use crate::{Error, Result};

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity>;
}

/// Trusts the identity headers set by an authenticating gateway.
#[derive(Clone, Debug)]
pub struct GatewayHeaders {
    pub user_id_header: String,
    pub user_name_header: String,
}

impl Default for GatewayHeaders {
    fn default() -> Self {
        Self { user_id_header: "x-user-id".into(), user_name_header: "x-user-name".into() }
    }
}

impl Authenticator for GatewayHeaders {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity> {
        let header = |name: &str| -> Result<String> {
            let value = headers
                .get(name)
                .ok_or_else(|| Error::Unauthorized(format!("missing {name} header")))?
                .to_str()
                .map_err(|_| Error::Unauthorized(format!("{name} is not valid text")))?
                .trim();
            if value.is_empty() {
                return Err(Error::Unauthorized(format!("{name} is empty")));
            }
            Ok(value.to_string())
        };
        let user_id = header(&self.user_id_header)?
            .parse::<i64>()
            .map_err(|_| Error::Unauthorized(format!("{} is not a user id", self.user_id_header)))?;
        let display_name = header(&self.user_name_header)?;
        Ok(Identity { user_id, display_name })
    }
}

/// Extractor that rejects the request unless the caller is authenticated.
pub struct Authenticated(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> std::result::Result<Self, Self::Rejection> {
        let identity = state.auth.authenticate(&parts.headers)?;
        Ok(Self(identity))
    }
}
