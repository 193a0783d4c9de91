//! # 文字・テストハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /characters?alphabetType&locale` - 全件一覧
//! - `GET /characters/row-column?alphabetType&locale&key` - 行・段での絞り込み
//! - `GET /characters/{id}?locale` - 文字詳細
//! - `GET /tests/reading?alphabetType&locale&count` - 読みテスト
//! - `GET /tests/writing?alphabetType&locale&count` - 書きテスト
//!
//! クエリパラメータは文字列のまま受け取り、検証はユースケースで行う。
//! 欠落したパラメータは空文字列として扱われ、400 になる。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use kana_shared::ApiResponse;
use serde::Deserialize;

use crate::{error::CoreError, usecase::CharacterUseCaseImpl};

/// 文字 API の共有状態
pub struct CharacterState {
    pub usecase: CharacterUseCaseImpl,
}

// --- リクエスト型 ---

/// 文字種とロケール
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionQuery {
    #[serde(default)]
    pub alphabet_type: String,
    #[serde(default)]
    pub locale:        String,
}

/// 行・段フィルタ
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowColumnQuery {
    #[serde(default)]
    pub alphabet_type: String,
    #[serde(default)]
    pub locale:        String,
    #[serde(default)]
    pub key:           String,
}

/// ロケールのみ
#[derive(Debug, Deserialize)]
pub struct LocaleQuery {
    #[serde(default)]
    pub locale: String,
}

/// テスト生成
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuery {
    #[serde(default)]
    pub alphabet_type: String,
    #[serde(default)]
    pub locale:        String,
    pub count:         Option<String>,
}

// --- ハンドラ ---

/// GET /characters
pub async fn list_characters(
    State(state): State<Arc<CharacterState>>,
    Query(query): Query<SelectionQuery>,
) -> Result<impl IntoResponse, CoreError> {
    let characters = state
        .usecase
        .list_all(&query.alphabet_type, &query.locale)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(characters))))
}

/// GET /characters/row-column
///
/// 段キー（a, i, u, e, o）なら `vowel`、それ以外は `consonant` だけを返す。
pub async fn list_characters_by_row_column(
    State(state): State<Arc<CharacterState>>,
    Query(query): Query<RowColumnQuery>,
) -> Result<impl IntoResponse, CoreError> {
    let characters = state
        .usecase
        .list_by_row_column(&query.alphabet_type, &query.locale, &query.key)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(characters))))
}

/// GET /characters/{id}
pub async fn get_character(
    State(state): State<Arc<CharacterState>>,
    Path(id): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, CoreError> {
    let character = state.usecase.get_by_id(&id, &query.locale).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(character))))
}

/// GET /tests/reading
///
/// 誤答候補が足りない場合は 422。
pub async fn get_reading_test(
    State(state): State<Arc<CharacterState>>,
    Query(query): Query<QuizQuery>,
) -> Result<impl IntoResponse, CoreError> {
    let items = state
        .usecase
        .reading_test(&query.alphabet_type, &query.locale, query.count.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(items))))
}

/// GET /tests/writing
pub async fn get_writing_test(
    State(state): State<Arc<CharacterState>>,
    Query(query): Query<QuizQuery>,
) -> Result<impl IntoResponse, CoreError> {
    let items = state
        .usecase
        .writing_test(&query.alphabet_type, &query.locale, query.count.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(items))))
}
