use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{auth, blog, contact, events, registrations, reviews, settings, team};

const BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_app(state: AppState) -> anyhow::Result<Router> {
    let origin = state.config.frontend_url.parse::<HeaderValue>()?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let api = Router::new()
        .merge(auth::router())
        .merge(registrations::router())
        .merge(events::router())
        .merge(team::router())
        .merge(blog::router())
        .merge(reviews::router())
        .merge(contact::router())
        .merge(settings::router())
        .route("/health", get(health));

    Ok(Router::new()
        .route("/", get(index))
        .nest("/api/v1", api)
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        ))
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Coding Council API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api/v1/health",
    }))
}

async fn health() -> Json<serde_json::Value> {
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    Json(json!({ "status": "ok", "timestamp": timestamp }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(%addr, frontend = %config.frontend_url, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        auth::{repo::UserStore, services::seed_admin},
        events::repo_types::EventStatus,
        registrations::repo_types::EventGate,
        testing::MemoryStore,
    };

    async fn seeded() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let state = AppState::fake(store.clone());
        seed_admin(store.as_ref(), &state.config.admin).await.unwrap();
        (build_app(state).unwrap(), store)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
        send(
            app,
            post_json(
                "/api/v1/auth/login",
                json!({ "email": email, "password": password }),
            ),
        )
        .await
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _) = seeded().await;
        let (status, body) = send(
            &app,
            Request::get("/api/v1/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (app, _) = seeded().await;
        let (status, body) = send(
            &app,
            Request::get("/api/v1/nope").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Endpoint not found" }));
    }

    #[tokio::test]
    async fn seeded_admin_logs_in_and_reads_me() {
        let (app, _) = seeded().await;
        let (status, body) = login(&app, "admin@codingcouncil.com", "admin123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "admin@codingcouncil.com");
        assert_eq!(body["user"]["role"], "super_admin");
        assert!(body["refreshToken"].is_string());

        let token = body["accessToken"].as_str().unwrap();
        let (status, me) = send(&app, get_with_token("/api/v1/auth/me", token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["user"]["email"], "admin@codingcouncil.com");
        assert!(me["user"].get("passwordHash").is_none());
        assert!(me["user"].get("refreshToken").is_none());
    }

    #[tokio::test]
    async fn bad_credentials_look_the_same() {
        let (app, _) = seeded().await;
        let wrong_password = login(&app, "admin@codingcouncil.com", "nope-nope").await;
        let unknown_email = login(&app, "ghost@codingcouncil.com", "admin123").await;
        assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn protected_route_needs_a_valid_token() {
        let (app, _) = seeded().await;
        let (status, body) = send(
            &app,
            Request::get("/api/v1/auth/me").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "No token provided");

        let (status, body) = send(&app, get_with_token("/api/v1/auth/me", "garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn expired_access_token_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let state = AppState::fake(store.clone());
        seed_admin(store.as_ref(), &state.config.admin).await.unwrap();
        let admin = store
            .find_by_email("admin@codingcouncil.com")
            .await
            .unwrap()
            .unwrap();
        let token = state.jwt.issue_expired_access_token(admin.id).unwrap();
        let app = build_app(state).unwrap();

        let (status, body) = send(&app, get_with_token("/api/v1/auth/me", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Token expired" }));
    }

    #[tokio::test]
    async fn token_for_missing_user_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let state = AppState::fake(store);
        let token = state.jwt.issue_access_token(uuid::Uuid::new_v4()).unwrap();
        let app = build_app(state).unwrap();

        let (status, body) = send(&app, get_with_token("/api/v1/auth/me", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[tokio::test]
    async fn refresh_token_cannot_mint_access_for_me() {
        let (app, _) = seeded().await;
        let (_, body) = login(&app, "admin@codingcouncil.com", "admin123").await;
        let refresh = body["refreshToken"].as_str().unwrap();
        let (status, _) = send(&app, get_with_token("/api/v1/auth/me", refresh)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn second_login_invalidates_first_refresh_token() {
        let (app, _) = seeded().await;
        let (_, first) = login(&app, "admin@codingcouncil.com", "admin123").await;
        let (_, second) = login(&app, "admin@codingcouncil.com", "admin123").await;

        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/auth/refresh",
                json!({ "refreshToken": first["refreshToken"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/auth/refresh",
                json!({ "refreshToken": second["refreshToken"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["accessToken"].is_string());
    }

    #[tokio::test]
    async fn admin_routes_reject_anonymous_callers() {
        let (app, _) = seeded().await;
        let id = uuid::Uuid::new_v4();
        let (status, _) = send(
            &app,
            Request::get(format!("/api/v1/registrations/stats/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn duplicate_registration_is_409() {
        let (app, store) = seeded().await;
        let event_id = store.add_event(EventGate {
            status: EventStatus::Upcoming,
            max_participants: None,
        });
        let form = json!({
            "eventId": event_id,
            "name": "Sana Khan",
            "email": "sana@example.com",
            "phone": "9876543210",
            "foodPreference": "Veg"
        });

        let (status, body) = send(&app, post_json("/api/v1/registrations", form.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Registration successful");

        let (status, body) = send(&app, post_json("/api/v1/registrations", form)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Already registered for this event");
        assert_eq!(store.registration_count(), 1);
    }

    #[tokio::test]
    async fn registration_for_unknown_event_is_404() {
        let (app, _) = seeded().await;
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/registrations",
                json!({
                    "eventId": uuid::Uuid::new_v4(),
                    "name": "Sana Khan",
                    "email": "sana@example.com",
                    "phone": "9876543210"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Event not found");
    }
}
