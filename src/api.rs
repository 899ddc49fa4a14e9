//! HTTP routes for the user resource.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::datastore::{NewUser, User, UserChanges, UserStore};
use crate::error::ApiError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
    pub redirect_url: String,
}

impl AppState {
    pub fn new(store: Arc<UserStore>, redirect_url: impl Into<String>) -> Self {
        Self {
            store,
            redirect_url: redirect_url.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
}

/// Treat an empty name the same as a missing one
fn non_empty(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.is_empty())
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>().map_err(|_| ApiError::InvalidId(raw.to_string()))
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Decode a JSON request body. A non-JSON or empty body reads as no fields set.
fn decode<T>(headers: &HeaderMap, body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "hello, world" }))
}

async fn redirect(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, state.redirect_url)])
}

async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store.list_users())
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    match state.store.get_user_by_id(id) {
        Some(user) => Ok(Json(user)),
        None => {
            debug!("user {} not found", id);
            Err(ApiError::UserNotFound)
        }
    }
}

async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let request: CreateUserRequest = decode(&headers, &body)?;
    let name = non_empty(request.name).ok_or(ApiError::MissingName)?;

    let user = state.store.create_user(NewUser { name });
    info!("created user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let request: UpdateUserRequest = match decode(&headers, &body) {
        Ok(request) => request,
        // An unknown id wins over a bad body
        Err(err) => {
            state.store.get_user_by_id(id).ok_or(ApiError::UserNotFound)?;
            return Err(err);
        }
    };

    let changes = UserChanges {
        name: non_empty(request.name),
    };
    let updated = state
        .store
        .update_user(id, changes)
        .ok_or(ApiError::UserNotFound)?;
    info!("updated user {}", updated.id);
    Ok(Json(updated))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.store.delete_user(id).ok_or(ApiError::UserNotFound)?;

    info!("deleted user {}", user.id);
    Ok(Json(json!({ "message": "User has been deleted" })))
}

async fn fallback() -> ApiError {
    ApiError::NotFound
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/lambda", get(redirect))
        .route("/health", get(|| async { "ok" }))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
        .fallback(fallback)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_digits() {
        assert_eq!(parse_id("12"), Ok(12));
    }

    #[test]
    fn test_parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("abc"), Err(ApiError::InvalidId("abc".into())));
        assert_eq!(parse_id("-1"), Err(ApiError::InvalidId("-1".into())));
    }

    #[test]
    fn test_empty_name_counts_as_missing() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("Ada".into())), Some("Ada".into()));
        assert_eq!(non_empty(None), None);
    }

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, content_type.parse().unwrap());
        headers
    }

    #[test]
    fn test_decode_without_json_content_type_is_empty_request() {
        let body = Bytes::from_static(b"name=Ada");
        let request: CreateUserRequest = decode(&HeaderMap::new(), &body).unwrap();
        assert!(request.name.is_none());

        let form = headers_with("application/x-www-form-urlencoded");
        let request: CreateUserRequest = decode(&form, &body).unwrap();
        assert!(request.name.is_none());
    }

    #[test]
    fn test_decode_empty_json_body_is_empty_request() {
        let headers = headers_with("application/json; charset=utf-8");
        let request: UpdateUserRequest = decode(&headers, &Bytes::new()).unwrap();
        assert!(request.name.is_none());
    }

    #[test]
    fn test_decode_broken_json_is_malformed() {
        let headers = headers_with("application/json");
        let result: Result<CreateUserRequest, _> = decode(&headers, &Bytes::from_static(b"{x"));
        assert!(matches!(result, Err(ApiError::MalformedBody(_))));
    }
}
