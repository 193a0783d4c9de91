//! # Kana ドメイン層
//!
//! ひらがな・カタカナ学習アプリの中核となるドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! core-api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）には一切依存しない。
//! 列名の対応表（[`character::AlphabetType::glyph_column`] など）もここで閉じた
//! 列挙型として定義し、インフラ層はそれを参照するだけにする。
//!
//! ## モジュール構成
//!
//! - [`character`] - 文字エンティティ、文字種・ロケール、行・段キーの分類
//! - [`quiz`] - 読み・書きテストの問題項目と出題数
//! - [`error`] - ドメイン層で発生するエラーの定義
//!
//! ## 使用例
//!
//! ```rust
//! use kana_domain::character::{AlphabetType, Locale};
//!
//! let alphabet = AlphabetType::parse("katakana").unwrap();
//! let locale = Locale::parse("russian").unwrap();
//!
//! assert_eq!(alphabet.glyph_column(), "katakana");
//! assert_eq!(locale.reading_column(), "russian_reading");
//! ```

pub mod character;
pub mod error;
pub mod quiz;

pub use error::DomainError;
