use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub value: String,
    pub date: String,
}

#[derive(Deserialize)]
pub struct RecordInput {
    pub title: String,
    pub description: String,
    pub value: String,
    pub date: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

struct User {
    name: String,
    password: String,
}

/// Users, issued tokens, and each user's records in insertion order.
#[derive(Default)]
pub struct Store {
    users: HashMap<String, User>,
    tokens: HashMap<String, String>,
    records: HashMap<String, Vec<HealthRecord>>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiError = (StatusCode, Json<ErrorBody>);

fn error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/healthRecords", get(list_records).post(create_record))
        .route("/healthRecords/{id}", put(update_record).delete(delete_record))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Resolve the bearer token to the owning user's email.
fn authenticate(store: &Store, headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "No token provided"))?;
    store
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid token"))
}

fn check_complete(input: &RecordInput) -> Result<(), ApiError> {
    let fields = [&input.title, &input.description, &input.value, &input.date];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(error(StatusCode::BAD_REQUEST, "All fields are required."));
    }
    Ok(())
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Registration>,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    if store.users.contains_key(&input.email) {
        return Err(error(StatusCode::CONFLICT, "User already exists"));
    }
    log::info!("registered {}", input.email);
    store.users.insert(
        input.email,
        User {
            name: input.name,
            password: input.password,
        },
    );
    Ok(StatusCode::CREATED)
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = db.write().await;
    let name = store
        .users
        .get(&input.email)
        .filter(|u| u.password == input.password)
        .map(|u| u.name.clone())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let token = Uuid::new_v4().simple().to_string();
    store.tokens.insert(token.clone(), input.email);
    Ok(Json(serde_json::json!({ "token": token, "name": name })))
}

async fn list_records(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<HealthRecord>>, ApiError> {
    let store = db.read().await;
    let user = authenticate(&store, &headers)?;
    Ok(Json(store.records.get(&user).cloned().unwrap_or_default()))
}

async fn create_record(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<RecordInput>,
) -> Result<(StatusCode, Json<HealthRecord>), ApiError> {
    let mut store = db.write().await;
    let user = authenticate(&store, &headers)?;
    check_complete(&input)?;
    let record = HealthRecord {
        id: Uuid::new_v4().simple().to_string(),
        title: input.title,
        description: input.description,
        value: input.value,
        date: input.date,
    };
    store.records.entry(user).or_default().push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_record(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<RecordInput>,
) -> Result<Json<HealthRecord>, ApiError> {
    let mut store = db.write().await;
    let user = authenticate(&store, &headers)?;
    check_complete(&input)?;
    let record = store
        .records
        .get_mut(&user)
        .and_then(|records| records.iter_mut().find(|r| r.id == id))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Record not found"))?;
    record.title = input.title;
    record.description = input.description;
    record.value = input.value;
    record.date = input.date;
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    let user = authenticate(&store, &headers)?;
    let records = store.records.entry(user).or_default();
    let before = records.len();
    records.retain(|r| r.id != id);
    if records.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "Record not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_underscore_id() {
        let record = HealthRecord {
            id: "a1".to_string(),
            title: "Weight".to_string(),
            description: "Morning".to_string(),
            value: "70".to_string(),
            date: "2024-01-01".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["_id"], "a1");
        assert_eq!(json["value"], "70");
    }

    #[test]
    fn record_input_rejects_missing_field() {
        let result: Result<RecordInput, _> =
            serde_json::from_str(r#"{"title":"Weight","description":"Morning","value":"70"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn blank_field_fails_completeness_check() {
        let input = RecordInput {
            title: "Weight".to_string(),
            description: " ".to_string(),
            value: "70".to_string(),
            date: "2024-01-01".to_string(),
        };
        let (status, Json(body)) = check_complete(&input).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "All fields are required.");
    }

    #[test]
    fn authenticate_requires_known_bearer_token() {
        let mut store = Store::default();
        store.tokens.insert("t".to_string(), "a@b.c".to_string());

        let mut headers = HeaderMap::new();
        assert!(authenticate(&store, &headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer nope".parse().unwrap());
        assert!(authenticate(&store, &headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer t".parse().unwrap());
        assert_eq!(authenticate(&store, &headers).unwrap(), "a@b.c");
    }
}
