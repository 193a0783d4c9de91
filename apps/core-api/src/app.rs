//! # ルーター構築
//!
//! レイヤーは外側から順に以下の構成になる:
//!
//! ```text
//! TraceLayer → TimeoutLayer → enforce_body_limit → handler
//! ```
//!
//! タイムアウトに達するとハンドラの future が破棄され、進行中のクエリも
//! 同時に打ち切られる（レスポンスは 408）。

use std::{sync::Arc, time::Duration};

use axum::{Router, http::StatusCode, middleware::from_fn_with_state, routing::get};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handler::{
        CharacterState,
        get_character,
        get_reading_test,
        get_writing_test,
        health_check,
        list_characters,
        list_characters_by_row_column,
    },
    middleware::{BodyLimit, enforce_body_limit},
};

/// Core API のルーターを構築する
pub fn build_router(state: Arc<CharacterState>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/characters", get(list_characters))
        .route("/characters/row-column", get(list_characters_by_row_column))
        .route("/characters/{id}", get(get_character))
        .route("/tests/reading", get(get_reading_test))
        .route("/tests/writing", get(get_writing_test))
        .with_state(state)
        .layer(from_fn_with_state(BodyLimit::default(), enforce_body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
