//! # リクエストボディ上限ミドルウェア
//!
//! すべてのリクエストボディを上限付きで読み取り、超過した場合は
//! ハンドラを呼ばずに固定の 413 レスポンス（`payload-too-large`）を返す。
//!
//! 1. `Content-Length` が上限を超えていれば読み取らずに拒否する
//! 2. ボディを上限付きで読み取り、途中で超過したら拒否する
//! 3. 読み取ったボディでリクエストを組み立て直して次に渡す

use axum::{
    Json,
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header::CONTENT_LENGTH},
    middleware::Next,
    response::{IntoResponse, Response},
};
use kana_shared::ErrorResponse;

/// リクエストボディの上限（10 MiB）
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;

/// ボディ上限の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLimit {
    max_bytes: usize,
}

impl BodyLimit {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    fn exceeded_by(&self, declared: u64) -> bool {
        !usize::try_from(declared).is_ok_and(|len| len <= self.max_bytes)
    }
}

impl Default for BodyLimit {
    fn default() -> Self {
        Self::new(MAX_REQUEST_BODY_BYTES)
    }
}

/// ボディ上限を適用するミドルウェア
///
/// `axum::middleware::from_fn_with_state(BodyLimit::default(), enforce_body_limit)` で登録する。
pub async fn enforce_body_limit(
    State(limit): State<BodyLimit>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    if let Some(declared) = declared.filter(|len| limit.exceeded_by(*len)) {
        tracing::warn!(
            declared,
            max_bytes = limit.max_bytes,
            "Content-Length が上限を超えています"
        );
        return payload_too_large();
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limit.max_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                error = %e,
                max_bytes = limit.max_bytes,
                "リクエストボディを上限内で読み取れませんでした"
            );
            return payload_too_large();
        }
    };

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn payload_too_large() -> Response {
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(ErrorResponse::payload_too_large()),
    )
        .into_response()
}
