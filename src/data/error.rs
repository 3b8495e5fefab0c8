use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize, Debug, PartialEq, Eq)]
pub enum Error {
    InternalServerError,
    NotFound,
    /// The body could not be read as a user payload.
    InvalidPayload(String),
    /// Fields that failed validation, named the way the client sent them.
    InvalidFields(Vec<String>),
    MissingField(String),
    MissingCredentials,
    IncorrectUsernameOrPassword,
    RegisteredUsername,
    RegisteredEmail,
    RegisteredSkill,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Error::InvalidFields(_) => StatusCode::BAD_REQUEST,
            Error::MissingField(_) => StatusCode::BAD_REQUEST,
            Error::MissingCredentials => StatusCode::BAD_REQUEST,
            // same answer for unknown usernames and wrong passwords
            Error::IncorrectUsernameOrPassword => StatusCode::UNAUTHORIZED,
            Error::RegisteredUsername => StatusCode::BAD_REQUEST,
            Error::RegisteredEmail => StatusCode::BAD_REQUEST,
            Error::RegisteredSkill => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({
                "error": self
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_variants_serialize_as_their_name() {
        let body = json!({ "error": Error::RegisteredEmail });
        assert_eq!(body.to_string(), r#"{"error":"RegisteredEmail"}"#);
    }

    #[test]
    fn invalid_fields_carry_the_field_list() {
        let body = json!({ "error": Error::InvalidFields(vec!["knownSkills".to_string()]) });
        assert_eq!(body.to_string(), r#"{"error":{"InvalidFields":["knownSkills"]}}"#);
    }

    #[test]
    fn credential_failures_are_unauthorized() {
        assert_eq!(
            Error::IncorrectUsernameOrPassword.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::MissingCredentials.status_code(), StatusCode::BAD_REQUEST);
    }
}
