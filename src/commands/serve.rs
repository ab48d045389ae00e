use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::controllers::paste;
use crate::error::ApiError;
use crate::rate_limit;
use crate::types::api::{CreatePaste, CreatedPaste};
use crate::types::Paste;
use crate::App;

/// Usage instructions served at the root.
const USAGE: &str = include_str!("../../assets/usage.txt");

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], app.config.port));

    let router = Router::new()
        .route("/", get(index))
        .route("/api/pastes", post(create_paste))
        .route("/api/pastes/:id", get(get_paste))
        .route("/api/pastes/:id/", get(get_paste)) // hack
        .route("/api/pastes/:id/raw", get(get_paste_raw))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(app.config.limits.max_body_size))
        .layer(middleware::from_fn_with_state(
            app.clone(),
            rate_limit::throttle,
        ))
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(app);

    info!("listening on http://{addr}");

    axum::Server::bind(&addr)
        .serve(router.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}

async fn index() -> &'static str {
    USAGE
}

async fn create_paste(
    State(mut app): State<App>,
    body: Result<Json<CreatePaste>, JsonRejection>,
) -> crate::ApiResult<impl IntoResponse> {
    // a body the extractor cannot parse is a validation failure, not a 422
    let Json(request) = body.map_err(|rejection| ApiError::InvalidBody {
        reason: rejection.body_text(),
    })?;

    let paste = paste::create(&mut app, request).await?;

    let path = format!("/api/pastes/{}", paste.id);
    let url = format!("{}/p/{}", app.config.frontend_url, paste.id);
    let raw_url = format!("{}{path}/raw", app.config.base_url);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, path)],
        Json(CreatedPaste {
            id: paste.id,
            url,
            raw_url,
            expires_at: paste.expires_at,
        }),
    ))
}

async fn get_paste(
    State(mut app): State<App>,
    Path(id): Path<String>,
) -> crate::ApiResult<Json<Paste>> {
    let paste = paste::fetch(&mut app, &id, true).await?;
    Ok(Json(paste))
}

/// Same lifecycle as the JSON route; the raw read charges the same counter.
async fn get_paste_raw(
    State(mut app): State<App>,
    Path(id): Path<String>,
) -> crate::ApiResult<impl IntoResponse> {
    let paste = paste::fetch(&mut app, &id, true).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        paste.content,
    ))
}
