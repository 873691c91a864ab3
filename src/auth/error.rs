use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures the mock backend reports to clients. `Display` is the message the
/// frontend shows, so it stays in Portuguese.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Credenciais inválidas")]
    InvalidCredentials,
    #[error("Usuário não encontrado")]
    UserNotFound,
    #[error("Refresh token expirado")]
    RefreshTokenExpired,
    #[error("Refresh token inválido")]
    MalformedToken,
    #[error("Nome, email, senha e CPF são obrigatórios")]
    MissingFields,
    #[error("Email inválido")]
    InvalidEmail,
    #[error("CPF inválido")]
    InvalidCpf,
    #[error("A senha deve ter pelo menos 6 caracteres")]
    PasswordTooShort,
    #[error("Email já cadastrado")]
    DuplicateEmail,
    #[error("CPF já cadastrado")]
    DuplicateCpf,
}

impl AuthError {
    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::RefreshTokenExpired | Self::MalformedToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::MissingFields
            | Self::InvalidEmail
            | Self::InvalidCpf
            | Self::PasswordTooShort => StatusCode::BAD_REQUEST,
            Self::DuplicateEmail | Self::DuplicateCpf => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_category() {
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::InvalidCpf.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::DuplicateCpf.status(), StatusCode::CONFLICT);
        assert_eq!(AuthError::RefreshTokenExpired.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn response_body_carries_message() {
        let res = AuthError::PasswordTooShort.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "A senha deve ter pelo menos 6 caracteres");
    }
}
