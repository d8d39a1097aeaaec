use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Process-wide signing material, read-only after startup.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: (now + self.ttl).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// A token is valid iff the signature matches and `now < exp`. The
    /// library check (zero leeway) still passes at `now == exp`, so that
    /// boundary is rejected here.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        if data.claims.exp as i64 <= OffsetDateTime::now_utc().unix_timestamp() {
            anyhow::bail!("token expired");
        }
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Auth gate: verified claims extracted from the `Authorization` header.
/// Handlers behind it never see an unauthenticated request.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(missing_or_malformed)?;

        let token = header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or_else(missing_or_malformed)?;

        // Signature mismatch, malformed structure and elapsed expiry all
        // collapse into the same rejection.
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthenticated("Token inválido ou expirado.".into())
        })?;

        Ok(AuthUser(claims))
    }
}

fn missing_or_malformed() -> ApiError {
    ApiError::Unauthenticated("Acesso não autorizado. Token ausente ou mal formatado.".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};

    fn make_keys(ttl_minutes: i64) -> JwtKeys {
        let mut state = AppState::fake();
        std::sync::Arc::make_mut(&mut state.config).jwt.ttl_minutes = ttl_minutes;
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys(60);
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "ana@x.com").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ana@x.com");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[tokio::test]
    async fn verify_rejects_wrong_secret() {
        let keys = make_keys(60);
        let token = keys.sign(Uuid::new_v4(), "ana@x.com").expect("sign");
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"another-secret"),
            decoding: DecodingKey::from_secret(b"another-secret"),
            ttl: Duration::minutes(60),
        };
        assert!(other.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_elapsed_expiry() {
        // Negative ttl issues a token that expired two minutes ago.
        let keys = make_keys(-2);
        let token = keys.sign(Uuid::new_v4(), "ana@x.com").expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_token_at_exact_expiry() {
        // Zero ttl issues a token whose exp is the issuance instant;
        // `now < exp` never holds for it.
        let keys = make_keys(0);
        let token = keys.sign(Uuid::new_v4(), "ana@x.com").expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_tampered_token() {
        let keys = make_keys(60);
        let mut token = keys.sign(Uuid::new_v4(), "ana@x.com").expect("sign");
        token.pop();
        token.push('A');
        assert!(keys.verify(&token).is_err());
    }

    async fn extract(state: &AppState, auth: Option<&str>) -> Result<AuthUser, ApiError> {
        let mut builder = Request::builder().uri("/api/user/profile");
        if let Some(v) = auth {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (mut parts, _) = builder.body(()).expect("request").into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn gate_accepts_fresh_token() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "ana@x.com").expect("sign");

        let AuthUser(claims) = extract(&state, Some(&format!("Bearer {token}")))
            .await
            .expect("gate should pass");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ana@x.com");
    }

    #[tokio::test]
    async fn gate_rejects_missing_header() {
        let state = AppState::fake();
        let err = extract(&state, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn gate_rejects_non_bearer_scheme() {
        let state = AppState::fake();
        let err = extract(&state, Some("Basic abc123")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn gate_rejects_empty_token() {
        let state = AppState::fake();
        let err = extract(&state, Some("Bearer ")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn gate_rejects_tampered_token() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let mut token = keys.sign(Uuid::new_v4(), "ana@x.com").expect("sign");
        let flipped = if token.ends_with('a') { 'b' } else { 'a' };
        token.pop();
        token.push(flipped);

        let err = extract(&state, Some(&format!("Bearer {token}")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }
}
