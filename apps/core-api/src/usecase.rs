//! # ユースケース層
//!
//! リクエストパラメータの検証とリポジトリ呼び出しを組み合わせる。

pub mod character;

pub use character::CharacterUseCaseImpl;
