//! # ミドルウェア
//!
//! ルーター全体に適用する axum ミドルウェア。

pub mod body_limit;

pub use body_limit::{BodyLimit, MAX_REQUEST_BODY_BYTES, enforce_body_limit};
