//! # リポジトリ実装
//!
//! ドメイン型を返すデータアクセスの具体的な実装を提供する。
//!
//! ## 設計方針
//!
//! - **トレイト境界**: ユースケースは [`CharacterRepository`] にのみ依存し、
//!   テストではモックに差し替える
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化

pub mod character_repository;
mod character_sql;

pub use character_repository::{CharacterRepository, PostgresCharacterRepository};
