// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use aidcase_api::{
    AidStats, AidTypeRequest, ApiError, AuthResponse, AuthenticationService, CreateUserRequest,
    CreateVisitRequest, DashboardOverview, FamilyRequest, FamilyStats, LoginRequest, MapData,
    QuickIndicators, RegisterRequest, UpdateUserRequest, UpdateVisitRequest, UserResponse,
    activate_user, aid_stats, count_families, create_aid_type, create_family, create_user,
    create_visit, deactivate_user, delete_aid_type, delete_family, delete_user, delete_visit,
    family_stats, get_aid_type, get_aid_type_by_name, get_family, get_user, get_visit,
    initialize_default_aid_types, list_active_aid_types, list_active_users, list_aid_types,
    list_aid_types_by_category, list_families, list_families_by_priority, list_recent_visits,
    list_unsynced_visits, list_users, list_users_by_role, list_visits, list_visits_by_family,
    login_user, map_data, overview, quick_indicators, search_families, update_aid_type,
    update_family, update_user, update_visit,
};
use aidcase_domain::{AidType, Family, Visit};
use aidcase_persistence::{PersistenceError, SqlitePersistence};

/// Development origins allowed to call this API from a browser.
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:4200", "http://localhost:4300"];

/// aidcase server - HTTP server for the aidcase case-management backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for all case-management records.
    persistence: Arc<Mutex<SqlitePersistence>>,
}

/// Query parameters for family search.
#[derive(Debug, Deserialize)]
struct SearchQuery {
    /// The free-text search term.
    query: Option<String>,
}

/// Query parameters for the profile-returning user login.
#[derive(Debug, Deserialize)]
struct UserLoginQuery {
    /// The account email address.
    email: String,
    /// The plain-text password.
    password: String,
}

/// Response for the aid catalog bootstrap endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InitializeResponse {
    /// Number of catalog entries inserted (0 when already populated).
    seeded: usize,
    /// A human-readable message.
    message: String,
}

/// Response for the auth health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Fixed status indicator.
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::AccountDisabled { .. } => StatusCode::FORBIDDEN,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

// ============================================================================
// Aid type handlers
// ============================================================================

/// Handler for GET `/aid-types`.
async fn handle_list_aid_types(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<AidType>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_aid_types(&mut persistence)?))
}

/// Handler for GET `/aid-types/{id}`.
async fn handle_get_aid_type(
    AxumState(app_state): AxumState<AppState>,
    Path(aid_type_id): Path<i64>,
) -> Result<Json<AidType>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_aid_type(&mut persistence, aid_type_id)?))
}

/// Handler for GET `/aid-types/name/{name}`.
async fn handle_get_aid_type_by_name(
    AxumState(app_state): AxumState<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AidType>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_aid_type_by_name(&mut persistence, &name)?))
}

/// Handler for POST `/aid-types`.
async fn handle_create_aid_type(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<AidTypeRequest>,
) -> Result<(StatusCode, Json<AidType>), HttpError> {
    info!(name = %request.name, "Handling create aid type request");

    let mut persistence = app_state.persistence.lock().await;
    let created: AidType = create_aid_type(&mut persistence, &request)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT `/aid-types/{id}`.
async fn handle_update_aid_type(
    AxumState(app_state): AxumState<AppState>,
    Path(aid_type_id): Path<i64>,
    Json(request): Json<AidTypeRequest>,
) -> Result<Json<AidType>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_aid_type(&mut persistence, aid_type_id, &request)?))
}

/// Handler for DELETE `/aid-types/{id}`.
async fn handle_delete_aid_type(
    AxumState(app_state): AxumState<AppState>,
    Path(aid_type_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    delete_aid_type(&mut persistence, aid_type_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/aid-types/category/{category}`.
async fn handle_list_aid_types_by_category(
    AxumState(app_state): AxumState<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<AidType>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_aid_types_by_category(&mut persistence, &category)?))
}

/// Handler for GET `/aid-types/active`.
async fn handle_list_active_aid_types(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<AidType>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_active_aid_types(&mut persistence)?))
}

/// Handler for POST `/aid-types/initialize`.
///
/// Seeds the starter catalog once; a populated catalog makes this a no-op.
async fn handle_initialize_aid_types(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<InitializeResponse>, HttpError> {
    info!("Handling aid type catalog initialization request");

    let mut persistence = app_state.persistence.lock().await;
    let seeded: usize = initialize_default_aid_types(&mut persistence)?;
    Ok(Json(InitializeResponse {
        seeded,
        message: String::from("Default aid types initialized successfully"),
    }))
}

// ============================================================================
// Auth handlers
// ============================================================================

/// Handler for POST `/auth/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), HttpError> {
    info!(email = %request.email, "Handling register request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AuthResponse = AuthenticationService::register(&mut persistence, &request)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, HttpError> {
    info!(email = %request.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(AuthenticationService::login(&mut persistence, &request)?))
}

/// Handler for POST `/auth/logout`.
///
/// Expects `Authorization: Bearer <token>`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let token: &str = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from(
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
        })?;

    let mut persistence = app_state.persistence.lock().await;
    AuthenticationService::logout(&mut persistence, token)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/auth/health`.
async fn handle_auth_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

// ============================================================================
// Dashboard handlers
// ============================================================================

/// Handler for GET `/dashboard/stats`.
async fn handle_dashboard_stats(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<DashboardOverview>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(overview(&mut persistence)?))
}

/// Handler for GET `/dashboard/family/{id}/stats`.
async fn handle_family_stats(
    AxumState(app_state): AxumState<AppState>,
    Path(family_id): Path<i64>,
) -> Result<Json<FamilyStats>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(family_stats(&mut persistence, family_id)?))
}

/// Handler for GET `/dashboard/map`.
async fn handle_map_data(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<MapData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(map_data(&mut persistence)?))
}

/// Handler for GET `/dashboard/aid-stats`.
async fn handle_aid_stats(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<AidStats>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(aid_stats(&mut persistence)?))
}

/// Handler for GET `/dashboard/indicators`.
async fn handle_quick_indicators(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<QuickIndicators>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(quick_indicators(&mut persistence)?))
}

// ============================================================================
// Family handlers
// ============================================================================

/// Handler for GET `/families`.
async fn handle_list_families(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Family>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_families(&mut persistence)?))
}

/// Handler for GET `/families/{id}`.
async fn handle_get_family(
    AxumState(app_state): AxumState<AppState>,
    Path(family_id): Path<i64>,
) -> Result<Json<Family>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_family(&mut persistence, family_id)?))
}

/// Handler for POST `/families`.
async fn handle_create_family(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<FamilyRequest>,
) -> Result<(StatusCode, Json<Family>), HttpError> {
    info!(head_of_family = %request.head_of_family, "Handling create family request");

    let mut persistence = app_state.persistence.lock().await;
    let created: Family = create_family(&mut persistence, &request)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT `/families/{id}`.
async fn handle_update_family(
    AxumState(app_state): AxumState<AppState>,
    Path(family_id): Path<i64>,
    Json(request): Json<FamilyRequest>,
) -> Result<Json<Family>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_family(&mut persistence, family_id, &request)?))
}

/// Handler for DELETE `/families/{id}`.
async fn handle_delete_family(
    AxumState(app_state): AxumState<AppState>,
    Path(family_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    delete_family(&mut persistence, family_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/families/search?query=`.
async fn handle_search_families(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Family>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(search_families(
        &mut persistence,
        query.query.as_deref(),
    )?))
}

/// Handler for GET `/families/priority/{priority}`.
async fn handle_list_families_by_priority(
    AxumState(app_state): AxumState<AppState>,
    Path(priority): Path<String>,
) -> Result<Json<Vec<Family>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_families_by_priority(&mut persistence, &priority)?))
}

/// Handler for GET `/families/count`.
async fn handle_count_families(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<i64>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(count_families(&mut persistence)?))
}

// ============================================================================
// User handlers
// ============================================================================

/// Handler for GET `/users`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<UserResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_users(&mut persistence)?))
}

/// Handler for GET `/users/{id}`.
async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_user(&mut persistence, user_id)?))
}

/// Handler for POST `/users`.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HttpError> {
    info!(email = %request.email, "Handling create user request");

    let mut persistence = app_state.persistence.lock().await;
    let created: UserResponse = create_user(&mut persistence, &request)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT `/users/{id}`.
async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_user(&mut persistence, user_id, &request)?))
}

/// Handler for DELETE `/users/{id}`.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    delete_user(&mut persistence, user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/users/login?email=&password=`.
///
/// The profile-returning login path; the token-issuing path lives on the
/// auth resource.
async fn handle_user_login(
    AxumState(app_state): AxumState<AppState>,
    Query(credentials): Query<UserLoginQuery>,
) -> Result<Json<UserResponse>, HttpError> {
    info!(email = %credentials.email, "Handling user login request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(login_user(
        &mut persistence,
        &credentials.email,
        &credentials.password,
    )?))
}

/// Handler for GET `/users/role/{role}`.
async fn handle_list_users_by_role(
    AxumState(app_state): AxumState<AppState>,
    Path(role): Path<String>,
) -> Result<Json<Vec<UserResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_users_by_role(&mut persistence, &role)?))
}

/// Handler for GET `/users/active`.
async fn handle_list_active_users(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<UserResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_active_users(&mut persistence)?))
}

/// Handler for PUT `/users/{id}/activate`.
async fn handle_activate_user(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(activate_user(&mut persistence, user_id)?))
}

/// Handler for PUT `/users/{id}/deactivate`.
async fn handle_deactivate_user(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(deactivate_user(&mut persistence, user_id)?))
}

// ============================================================================
// Visit handlers
// ============================================================================

/// Handler for GET `/visits`.
async fn handle_list_visits(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Visit>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_visits(&mut persistence)?))
}

/// Handler for GET `/visits/{id}`.
async fn handle_get_visit(
    AxumState(app_state): AxumState<AppState>,
    Path(visit_id): Path<i64>,
) -> Result<Json<Visit>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_visit(&mut persistence, visit_id)?))
}

/// Handler for POST `/visits/family/{family_id}`.
async fn handle_create_visit(
    AxumState(app_state): AxumState<AppState>,
    Path(family_id): Path<i64>,
    Json(request): Json<CreateVisitRequest>,
) -> Result<(StatusCode, Json<Visit>), HttpError> {
    info!(family_id, "Handling create visit request");

    let mut persistence = app_state.persistence.lock().await;
    let created: Visit = create_visit(&mut persistence, family_id, &request)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT `/visits/{id}`.
async fn handle_update_visit(
    AxumState(app_state): AxumState<AppState>,
    Path(visit_id): Path<i64>,
    Json(request): Json<UpdateVisitRequest>,
) -> Result<Json<Visit>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_visit(&mut persistence, visit_id, &request)?))
}

/// Handler for DELETE `/visits/{id}`.
async fn handle_delete_visit(
    AxumState(app_state): AxumState<AppState>,
    Path(visit_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    delete_visit(&mut persistence, visit_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/visits/family/{family_id}`.
async fn handle_list_visits_by_family(
    AxumState(app_state): AxumState<AppState>,
    Path(family_id): Path<i64>,
) -> Result<Json<Vec<Visit>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_visits_by_family(&mut persistence, family_id)?))
}

/// Handler for GET `/visits/recent`.
async fn handle_list_recent_visits(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Visit>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_recent_visits(&mut persistence)?))
}

/// Handler for GET `/visits/unsynced`.
async fn handle_list_unsynced_visits(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Visit>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_unsynced_visits(&mut persistence)?))
}

/// Cross-origin layer for the fixed local development origins.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/aid-types", get(handle_list_aid_types))
        .route("/aid-types", post(handle_create_aid_type))
        .route("/aid-types/active", get(handle_list_active_aid_types))
        .route("/aid-types/initialize", post(handle_initialize_aid_types))
        .route(
            "/aid-types/category/{category}",
            get(handle_list_aid_types_by_category),
        )
        .route("/aid-types/name/{name}", get(handle_get_aid_type_by_name))
        .route("/aid-types/{id}", get(handle_get_aid_type))
        .route("/aid-types/{id}", put(handle_update_aid_type))
        .route("/aid-types/{id}", delete(handle_delete_aid_type))
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/health", get(handle_auth_health))
        .route("/dashboard/stats", get(handle_dashboard_stats))
        .route("/dashboard/family/{id}/stats", get(handle_family_stats))
        .route("/dashboard/map", get(handle_map_data))
        .route("/dashboard/aid-stats", get(handle_aid_stats))
        .route("/dashboard/indicators", get(handle_quick_indicators))
        .route("/families", get(handle_list_families))
        .route("/families", post(handle_create_family))
        .route("/families/search", get(handle_search_families))
        .route(
            "/families/priority/{priority}",
            get(handle_list_families_by_priority),
        )
        .route("/families/count", get(handle_count_families))
        .route("/families/{id}", get(handle_get_family))
        .route("/families/{id}", put(handle_update_family))
        .route("/families/{id}", delete(handle_delete_family))
        .route("/users", get(handle_list_users))
        .route("/users", post(handle_create_user))
        .route("/users/login", post(handle_user_login))
        .route("/users/role/{role}", get(handle_list_users_by_role))
        .route("/users/active", get(handle_list_active_users))
        .route("/users/{id}", get(handle_get_user))
        .route("/users/{id}", put(handle_update_user))
        .route("/users/{id}", delete(handle_delete_user))
        .route("/users/{id}/activate", put(handle_activate_user))
        .route("/users/{id}/deactivate", put(handle_deactivate_user))
        .route("/visits", get(handle_list_visits))
        .route("/visits/recent", get(handle_list_recent_visits))
        .route("/visits/unsynced", get(handle_list_unsynced_visits))
        .route("/visits/family/{family_id}", post(handle_create_visit))
        .route("/visits/family/{family_id}", get(handle_list_visits_by_family))
        .route("/visits/{id}", get(handle_get_visit))
        .route("/visits/{id}", put(handle_update_visit))
        .route("/visits/{id}", delete(handle_delete_visit))
        .layer(cors_layer())
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing aidcase server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn create_test_family_request(reference: &str) -> FamilyRequest {
        FamilyRequest {
            reference: Some(reference.to_string()),
            head_of_family: String::from("Mohamed Trabelsi"),
            phone: None,
            address: Some(String::from("12 rue des Oliviers, Kairouan")),
            family_size: Some(5),
            needs_description: None,
            priority_level: Some(String::from("High")),
            latitude: None,
            longitude: None,
            notes: None,
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_auth_health() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(empty_request("GET", "/auth/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let health: HealthResponse = read_json(response).await;
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_create_and_get_family() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/families",
                &create_test_family_request("FAM-0001"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);
        let created: Family = read_json(response).await;
        let family_id = created.family_id.unwrap();

        let response = app
            .oneshot(empty_request("GET", &format!("/families/{family_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let fetched: Family = read_json(response).await;
        assert_eq!(fetched.reference, "FAM-0001");
    }

    #[tokio::test]
    async fn test_duplicate_family_reference_returns_conflict() {
        let app: Router = build_router(create_test_app_state());

        let request = create_test_family_request("FAM-0001");
        let first = app
            .clone()
            .oneshot(json_request("POST", "/families", &request))
            .await
            .unwrap();
        assert_eq!(first.status(), HttpStatusCode::CREATED);

        let second = app
            .oneshot(json_request("POST", "/families", &request))
            .await
            .unwrap();
        assert_eq!(second.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_get_missing_family_returns_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(empty_request("GET", "/families/999"))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_priority_token_returns_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(empty_request("GET", "/families/priority/urgent"))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_family_search_and_count() {
        let app: Router = build_router(create_test_app_state());

        app.clone()
            .oneshot(json_request(
                "POST",
                "/families",
                &create_test_family_request("FAM-0001"),
            ))
            .await
            .unwrap();

        let search = app
            .clone()
            .oneshot(empty_request("GET", "/families/search?query=trabelsi"))
            .await
            .unwrap();
        assert_eq!(search.status(), HttpStatusCode::OK);
        let matches: Vec<Family> = read_json(search).await;
        assert_eq!(matches.len(), 1);

        let count = app
            .oneshot(empty_request("GET", "/families/count"))
            .await
            .unwrap();
        let total: i64 = read_json(count).await;
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_aid_type_initialize_is_idempotent() {
        let app: Router = build_router(create_test_app_state());

        let first = app
            .clone()
            .oneshot(empty_request("POST", "/aid-types/initialize"))
            .await
            .unwrap();
        assert_eq!(first.status(), HttpStatusCode::OK);
        let seeded: InitializeResponse = read_json(first).await;
        assert_eq!(seeded.seeded, 6);

        let second = app
            .clone()
            .oneshot(empty_request("POST", "/aid-types/initialize"))
            .await
            .unwrap();
        let reseeded: InitializeResponse = read_json(second).await;
        assert_eq!(reseeded.seeded, 0);

        let listing = app
            .oneshot(empty_request("GET", "/aid-types"))
            .await
            .unwrap();
        let aid_types: Vec<AidType> = read_json(listing).await;
        assert_eq!(aid_types.len(), 6);
    }

    #[tokio::test]
    async fn test_visit_lifecycle_under_family() {
        let app: Router = build_router(create_test_app_state());

        let family_response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/families",
                &create_test_family_request("FAM-0001"),
            ))
            .await
            .unwrap();
        let family: Family = read_json(family_response).await;
        let family_id = family.family_id.unwrap();

        let visit_request = CreateVisitRequest {
            volunteer_id: None,
            visit_date: Some(String::from("2026-03-01")),
            visit_type: Some(String::from("REGULAR")),
            observations: None,
            location_lat: None,
            location_lng: None,
            identified_needs: vec![String::from("Blankets")],
            next_visit_date: None,
        };

        let created_response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/visits/family/{family_id}"),
                &visit_request,
            ))
            .await
            .unwrap();
        assert_eq!(created_response.status(), HttpStatusCode::CREATED);
        let visit: Visit = read_json(created_response).await;
        let visit_id = visit.visit_id.unwrap();
        assert!(visit.synced);

        let listed = app
            .clone()
            .oneshot(empty_request("GET", &format!("/visits/family/{family_id}")))
            .await
            .unwrap();
        let visits: Vec<Visit> = read_json(listed).await;
        assert_eq!(visits.len(), 1);

        let deleted = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/visits/{visit_id}")))
            .await
            .unwrap();
        assert_eq!(deleted.status(), HttpStatusCode::NO_CONTENT);

        let missing = app
            .oneshot(empty_request("GET", &format!("/visits/{visit_id}")))
            .await
            .unwrap();
        assert_eq!(missing.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_visit_for_unknown_family_returns_not_found() {
        let app: Router = build_router(create_test_app_state());

        let visit_request = CreateVisitRequest {
            volunteer_id: None,
            visit_date: None,
            visit_type: None,
            observations: None,
            location_lat: None,
            location_lng: None,
            identified_needs: Vec::new(),
            next_visit_date: None,
        };

        let response = app
            .oneshot(json_request("POST", "/visits/family/999", &visit_request))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_login_via_query_params() {
        let app: Router = build_router(create_test_app_state());

        let user_request = CreateUserRequest {
            first_name: String::from("Amina"),
            last_name: String::from("Ben Salah"),
            email: String::from("a@b.com"),
            phone: None,
            password: String::from("s3cret"),
            role: None,
            active: None,
        };

        let created = app
            .clone()
            .oneshot(json_request("POST", "/users", &user_request))
            .await
            .unwrap();
        assert_eq!(created.status(), HttpStatusCode::CREATED);

        let login = app
            .clone()
            .oneshot(empty_request(
                "POST",
                "/users/login?email=a@b.com&password=s3cret",
            ))
            .await
            .unwrap();
        assert_eq!(login.status(), HttpStatusCode::OK);
        let profile: UserResponse = read_json(login).await;
        assert!(profile.last_login_at.is_some());

        let wrong = app
            .oneshot(empty_request(
                "POST",
                "/users/login?email=a@b.com&password=wrong",
            ))
            .await
            .unwrap();
        assert_eq!(wrong.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_register_login_and_logout() {
        let app: Router = build_router(create_test_app_state());

        let register_request = RegisterRequest {
            first_name: String::from("Amina"),
            last_name: String::from("Ben Salah"),
            email: String::from("a@b.com"),
            phone: None,
            password: String::from("s3cret"),
            role: None,
        };

        let registered = app
            .clone()
            .oneshot(json_request("POST", "/auth/register", &register_request))
            .await
            .unwrap();
        assert_eq!(registered.status(), HttpStatusCode::CREATED);
        let auth: AuthResponse = read_json(registered).await;
        assert!(!auth.token.is_empty());
        assert_eq!(auth.role, "Volunteer");

        let duplicate = app
            .clone()
            .oneshot(json_request("POST", "/auth/register", &register_request))
            .await
            .unwrap();
        assert_eq!(duplicate.status(), HttpStatusCode::CONFLICT);

        let login = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                &LoginRequest {
                    email: String::from("a@b.com"),
                    password: String::from("s3cret"),
                },
            ))
            .await
            .unwrap();
        assert_eq!(login.status(), HttpStatusCode::OK);

        let logout = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .header("Authorization", format!("Bearer {}", auth.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(logout.status(), HttpStatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_dashboard_endpoints_respond() {
        let app: Router = build_router(create_test_app_state());

        for uri in [
            "/dashboard/stats",
            "/dashboard/map",
            "/dashboard/aid-stats",
            "/dashboard/indicators",
        ] {
            let response = app.clone().oneshot(empty_request("GET", uri)).await.unwrap();
            assert_eq!(response.status(), HttpStatusCode::OK, "GET {uri}");
        }

        let missing = app
            .oneshot(empty_request("GET", "/dashboard/family/999/stats"))
            .await
            .unwrap();
        assert_eq!(missing.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deactivated_user_cannot_login() {
        let app: Router = build_router(create_test_app_state());

        let user_request = CreateUserRequest {
            first_name: String::from("Amina"),
            last_name: String::from("Ben Salah"),
            email: String::from("a@b.com"),
            phone: None,
            password: String::from("s3cret"),
            role: None,
            active: None,
        };

        let created = app
            .clone()
            .oneshot(json_request("POST", "/users", &user_request))
            .await
            .unwrap();
        let profile: UserResponse = read_json(created).await;

        let deactivated = app
            .clone()
            .oneshot(empty_request(
                "PUT",
                &format!("/users/{}/deactivate", profile.user_id),
            ))
            .await
            .unwrap();
        assert_eq!(deactivated.status(), HttpStatusCode::OK);

        let login = app
            .oneshot(empty_request(
                "POST",
                "/users/login?email=a@b.com&password=s3cret",
            ))
            .await
            .unwrap();
        assert_eq!(login.status(), HttpStatusCode::FORBIDDEN);
    }
}
