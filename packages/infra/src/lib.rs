//! # かな学習 インフラ層
//!
//! PostgreSQL との接続と、文字データの読み取りを担当するインフラストラクチャ層。
//!
//! ## 依存関係
//!
//! ```text
//! core-api → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、マイグレーション、接続先の解決
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - `mock` - テスト用インメモリリポジトリ（`test-utils` feature）

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
