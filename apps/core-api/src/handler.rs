//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは薄く保ち、検証と取得はユースケースに委譲する

pub mod character;
pub mod health;

pub use character::{
    CharacterState,
    get_character,
    get_reading_test,
    get_writing_test,
    list_characters,
    list_characters_by_row_column,
};
pub use health::health_check;
