//! # Kana Core API
//!
//! かな学習用の参照・テスト生成 API。
//!
//! ## レイヤー構成
//!
//! ```text
//! handler → usecase → CharacterRepository（kana-infra）→ PostgreSQL
//! ```
//!
//! - `handler`: クエリパラメータの受け取りとレスポンス整形
//! - `usecase`: パラメータ検証。検証に失敗した場合はクエリを発行しない
//! - `error`: [`CoreError`](error::CoreError) から RFC 9457 形式のレスポンスへの変換

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
