use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, ProfileResponse, PublicUser, RegisterRequest,
            RegisterResponse, RegisteredUser,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::{User, EMAIL_UNIQUE_CONSTRAINT},
    },
    error::{ApiError, StoreError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/user/profile", get(profile))
}

fn map_create_error(email: &str, e: StoreError) -> ApiError {
    match e {
        StoreError::ConstraintViolation(name) if name == EMAIL_UNIQUE_CONSTRAINT => {
            warn!(email = %email, "email already registered");
            ApiError::DuplicateEmail
        }
        e => ApiError::Internal(e.into()),
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if payload.nome.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.senha.trim().is_empty()
    {
        warn!("register with missing fields");
        return Err(ApiError::Validation(
            "Todos os campos (nome, email, senha) são obrigatórios.".into(),
        ));
    }

    let senha_hash = hash_password(&payload.senha).map_err(ApiError::Internal)?;

    let user = User::create(&state.db, &payload.nome, &payload.email, &senha_hash)
        .await
        .map_err(|e| map_create_error(&payload.email, e))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Usuário cadastrado com sucesso!".into(),
            user: RegisteredUser {
                id: user.id,
                nome: user.nome,
                email: user.email,
                criado_em: user.criado_em,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.email.trim().is_empty() || payload.senha.trim().is_empty() {
        warn!("login with missing fields");
        return Err(ApiError::Validation(
            "Email e senha são obrigatórios.".into(),
        ));
    }

    // Unknown email and wrong password fail identically so account
    // existence does not leak.
    let user = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login with unknown email");
            ApiError::InvalidCredentials
        })?;

    let ok = verify_password(&payload.senha, &user.senha_hash).map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email).map_err(ApiError::Internal)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login realizado com sucesso!".into(),
        token,
        user: PublicUser {
            id: user.id,
            nome: user.nome,
            email: user.email,
        },
    }))
}

/// Answers from the verified claims alone, with no store lookup; the data is
/// as fresh as the token.
#[instrument(skip_all)]
pub async fn profile(AuthUser(claims): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: "Acesso autorizado à rota protegida.".into(),
        user_id_logado: claims.sub,
        email_logado: claims.email,
    })
}
