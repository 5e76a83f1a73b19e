//! Request builder and response parser for the health-records API.
//!
//! # Design
//! `RecordsClient` holds the base URL and the session's bearer token and
//! carries no other state. Each operation is split into a `build_*` method
//! that produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the round-trip in between.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{LoginRequest, LoginResponse, Record, RecordFields, RecordId, RegisterRequest};

const RECORDS_PATH: &str = "/healthRecords";

/// Characters that cannot appear raw inside one path segment.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn record_path(id: &RecordId) -> String {
    format!("{RECORDS_PATH}/{}", utf8_percent_encode(id.as_str(), SEGMENT_ENCODE_SET))
}

#[derive(Debug, Clone)]
pub struct RecordsClient {
    base_url: String,
    token: Option<String>,
}

impl RecordsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach `token` as `Authorization: Bearer <token>` to record requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    pub fn build_list_records(&self) -> HttpRequest {
        self.request(HttpMethod::Get, RECORDS_PATH.to_string(), None)
    }

    pub fn build_create_record(&self, fields: &RecordFields) -> Result<HttpRequest, ApiError> {
        let body = to_json(fields)?;
        Ok(self.request(HttpMethod::Post, RECORDS_PATH.to_string(), Some(body)))
    }

    pub fn build_update_record(
        &self,
        id: &RecordId,
        fields: &RecordFields,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(fields)?;
        Ok(self.request(HttpMethod::Put, record_path(id), Some(body)))
    }

    pub fn build_delete_record(&self, id: &RecordId) -> HttpRequest {
        self.request(HttpMethod::Delete, record_path(id), None)
    }

    pub fn parse_list_records(&self, response: HttpResponse) -> Result<Vec<Record>, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    pub fn parse_create_record(&self, response: HttpResponse) -> Result<Record, ApiError> {
        check_status(&response, &[201, 200])?;
        from_json(&response.body)
    }

    pub fn parse_update_record(&self, response: HttpResponse) -> Result<Record, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    pub fn parse_delete_record(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[204, 200])
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        Ok(self.unauthenticated(HttpMethod::Post, "/auth/login", to_json(input)?))
    }

    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest, ApiError> {
        Ok(self.unauthenticated(HttpMethod::Post, "/auth/register", to_json(input)?))
    }

    /// Extract the bearer token from a successful login.
    pub fn parse_login(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, &[200])?;
        let body: LoginResponse = from_json(&response.body)?;
        Ok(body.token)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[201, 200])
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }

    fn unauthenticated(&self, method: HttpMethod, path: &str, body: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map statuses outside `expected` to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    let body = response.body.clone();
    Err(match response.status {
        401 => ApiError::Unauthorized { body },
        404 => ApiError::NotFound { body },
        status => ApiError::HttpError { status, body },
    })
}
