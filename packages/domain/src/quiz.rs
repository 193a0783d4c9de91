//! # 読み・書きテスト
//!
//! ランダム出題で生成される問題項目と出題数を定義する。
//!
//! ## 問題項目の組み立て
//!
//! 1. 正解候補（[`QuizCandidate`]）を出題数だけ無作為に取得する
//! 2. 書きテストは候補をそのまま [`WritingTestItem`] に射影する
//! 3. 読みテストは候補ごとに誤答（ディストラクタ）を
//!    [`WRONG_OPTION_COUNT`] 個割り当てて [`ReadingTestItem`] にする
//!
//! 誤答の個数は配列長で固定しているため、誤答が揃わない候補から
//! `ReadingTestItem` を作ることはできない。

use serde::{Deserialize, Serialize};

use crate::{DomainError, character::CharacterId};

/// 読みテスト 1 問あたりの誤答数
pub const WRONG_OPTION_COUNT: usize = 2;

// =========================================================================
// QuizCount
// =========================================================================

/// 出題数
///
/// # 不変条件
///
/// - 0 以上（上限はなく、行数を超える分は結果が短くなるだけ）
/// - 未指定時は [`QuizCount::DEFAULT`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuizCount(i64);

impl QuizCount {
    /// 未指定時の出題数
    pub const DEFAULT: i64 = 10;

    /// 出題数を作成する
    ///
    /// 負の値は [`DomainError::Validation`]。
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value < 0 {
            return Err(DomainError::Validation(format!(
                "count は 0 以上である必要があります: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// リクエストの任意パラメータから出題数を決定する
    pub fn from_request(value: Option<i64>) -> Result<Self, DomainError> {
        match value {
            Some(v) => Self::new(v),
            None => Ok(Self(Self::DEFAULT)),
        }
    }

    /// `LIMIT` バインド用
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// 取り出す最大件数（`usize` に収まらない値は `usize::MAX`）
    pub fn limit(&self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =========================================================================
// QuizCandidate
// =========================================================================

/// 出題候補（字形と読みが空でないことが保証された行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizCandidate {
    pub id:      CharacterId,
    pub glyph:   String,
    pub reading: String,
}

impl QuizCandidate {
    /// 誤答を割り当てて読みテストの問題にする
    pub fn into_reading_item(self, wrong_options: [String; WRONG_OPTION_COUNT]) -> ReadingTestItem {
        ReadingTestItem {
            id: self.id,
            correct_char: self.glyph,
            reading: self.reading,
            wrong_options,
        }
    }

    /// 書きテストの問題にする
    pub fn into_writing_item(self) -> WritingTestItem {
        WritingTestItem {
            id:              self.id,
            character:       self.glyph,
            correct_reading: self.reading,
        }
    }
}

// =========================================================================
// ReadingTestItem / WritingTestItem
// =========================================================================

/// 読みテストの問題
///
/// 字形の選択肢は `correct_char` と `wrong_options` の計 3 つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingTestItem {
    pub id:            CharacterId,
    pub correct_char:  String,
    pub reading:       String,
    pub wrong_options: [String; WRONG_OPTION_COUNT],
}

/// 書きテストの問題
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingTestItem {
    pub id:              CharacterId,
    pub character:       String,
    pub correct_reading: String,
}
