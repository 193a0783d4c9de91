//! # 文字（かな）
//!
//! `characters` テーブルの 1 行に対応するエンティティと、その射影を定義する。
//!
//! ## 設計方針
//!
//! - **閉じた列挙型による列選択**: 文字種（[`AlphabetType`]）とロケール（[`Locale`]）は
//!   列挙型で表現し、各値に対応する列名を `&'static str` で返す。SQL
//!   テキストに埋め込まれるのはこの列名だけで、利用者の入力は必ずバインドパラメータになる
//! - **境界での一度きりの検証**: 文字列からの変換は [`AlphabetType::parse`] /
//!   [`Locale::parse`] で行い、失敗は [`DomainError::Validation`] になる
//! - **分類子の表現**: `consonant` / `vowel` はレスポンスでは `Option<String>` とし、
//!   空文字列は `None` に正規化する。JSON では `None` のフィールドを出力しない
//!
//! ## 行・段の分類
//!
//! 五十音表の「段」（母音）は `a, i, u, e, o` の 5 つ。キーがこのいずれかなら
//! [`RowColumnKey::Vowel`]、それ以外は [`RowColumnKey::Consonant`]（行）として扱う。

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::DomainError;

/// 母音（段）を表すキーの集合
pub const VOWELS: [&str; 5] = ["a", "i", "u", "e", "o"];

// =========================================================================
// CharacterId
// =========================================================================

/// 文字の一意識別子
///
/// `characters.id`（INTEGER）をラップする。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct CharacterId(i32);

impl CharacterId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    /// DB バインド用の i32 値
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

// =========================================================================
// AlphabetType / Locale
// =========================================================================

/// 文字種（ひらがな / カタカナ）
///
/// 各値は字形を格納する列（グリフ列）に対応する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlphabetType {
    Hiragana,
    Katakana,
}

impl AlphabetType {
    /// リクエスト文字列から文字種を決定する
    ///
    /// `hiragana` / `katakana` 以外は [`DomainError::Validation`]。
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Self::from_str(value)
            .map_err(|_| DomainError::Validation(format!("不正な alphabetType です: {value:?}")))
    }

    /// 字形を格納する列名
    pub fn glyph_column(&self) -> &'static str {
        match self {
            Self::Hiragana => "hiragana",
            Self::Katakana => "katakana",
        }
    }
}

/// 読みのロケール（英語 / ロシア語）
///
/// 各値は読みを格納する列（読み列）に対応する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    English,
    Russian,
}

impl Locale {
    /// リクエスト文字列からロケールを決定する
    ///
    /// `english` / `russian` 以外は [`DomainError::Validation`]。
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Self::from_str(value)
            .map_err(|_| DomainError::Validation(format!("不正な locale です: {value:?}")))
    }

    /// 読みを格納する列名
    pub fn reading_column(&self) -> &'static str {
        match self {
            Self::English => "english_reading",
            Self::Russian => "russian_reading",
        }
    }
}

// =========================================================================
// RowColumnKey
// =========================================================================

/// 行・段フィルタのキー
///
/// 検索条件（`consonant = key OR vowel = key`）は同じだが、レスポンスに
/// どちらの分類子を載せるかがキーの種類で変わる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowColumnKey {
    /// 段（母音）: `a, i, u, e, o`
    Vowel(String),
    /// 行（子音）: 母音以外のすべてのキー
    Consonant(String),
}

impl RowColumnKey {
    /// キー文字列を分類する
    ///
    /// 前後の空白は取り除く。空のキーは [`DomainError::Validation`]
    /// （空の分類子は「該当なし」を意味するため、検索キーとしては使えない）。
    pub fn parse(key: &str) -> Result<Self, DomainError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::Validation("key は必須です".to_string()));
        }

        if VOWELS.contains(&key) {
            Ok(Self::Vowel(key.to_string()))
        } else {
            Ok(Self::Consonant(key.to_string()))
        }
    }

    /// バインドパラメータとして使うキー文字列
    pub fn as_str(&self) -> &str {
        match self {
            Self::Vowel(key) | Self::Consonant(key) => key,
        }
    }

    pub fn is_vowel(&self) -> bool {
        matches!(self, Self::Vowel(_))
    }
}

// =========================================================================
// Character
// =========================================================================

/// 文字エンティティ（ID 指定の詳細取得結果）
///
/// 読みは要求されたロケールの列だけが必ず埋まり、もう一方は `None` のまま。
/// 読み列が NULL の行では空文字列が入る。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id:              CharacterId,
    pub consonant:       String,
    pub vowel:           String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hiragana:        Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub katakana:        Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english_reading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub russian_reading: Option<String>,
}

impl Character {
    /// DB の行から文字を組み立てる
    ///
    /// `reading` は `locale` に対応するフィールドにだけ格納される。
    pub fn from_db(
        id: CharacterId,
        consonant: String,
        vowel: String,
        hiragana: Option<String>,
        katakana: Option<String>,
        locale: Locale,
        reading: String,
    ) -> Self {
        let (english_reading, russian_reading) = match locale {
            Locale::English => (Some(reading), None),
            Locale::Russian => (None, Some(reading)),
        };

        Self {
            id,
            consonant,
            vowel,
            hiragana,
            katakana,
            english_reading,
            russian_reading,
        }
    }
}

// =========================================================================
// CharacterResponse
// =========================================================================

/// 一覧・フィルタ用の文字射影
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterResponse {
    pub id:        CharacterId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consonant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vowel:     Option<String>,
    pub character: String,
    pub reading:   String,
}

impl CharacterResponse {
    /// 全件一覧用: 行が持つ分類子をそのまま載せる（空文字列は `None`）
    pub fn from_listing(
        id: CharacterId,
        consonant: Option<String>,
        vowel: Option<String>,
        character: String,
        reading: String,
    ) -> Self {
        Self {
            id,
            consonant: non_empty(consonant),
            vowel: non_empty(vowel),
            character,
            reading,
        }
    }

    /// 行・段フィルタ用: 一致条件になった分類子だけを載せる
    pub fn from_row_column(
        id: CharacterId,
        key: &RowColumnKey,
        character: String,
        reading: String,
    ) -> Self {
        let (consonant, vowel) = match key {
            RowColumnKey::Vowel(v) => (None, Some(v.clone())),
            RowColumnKey::Consonant(c) => (Some(c.clone()), None),
        };

        Self {
            id,
            consonant,
            vowel,
            character,
            reading,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    // =========================================================================
    // AlphabetType / Locale のテスト
    // =========================================================================

    #[rstest]
    #[case("hiragana", AlphabetType::Hiragana, "hiragana")]
    #[case("katakana", AlphabetType::Katakana, "katakana")]
    fn test_文字種はグリフ列に対応する(
        #[case] input: &str,
        #[case] expected: AlphabetType,
        #[case] column: &str,
    ) {
        let alphabet = AlphabetType::parse(input).unwrap();
        assert_eq!(alphabet, expected);
        assert_eq!(alphabet.glyph_column(), column);
    }

    #[rstest]
    #[case("english", Locale::English, "english_reading")]
    #[case("russian", Locale::Russian, "russian_reading")]
    fn test_ロケールは読み列に対応する(
        #[case] input: &str,
        #[case] expected: Locale,
        #[case] column: &str,
    ) {
        let locale = Locale::parse(input).unwrap();
        assert_eq!(locale, expected);
        assert_eq!(locale.reading_column(), column);
    }

    #[rstest]
    #[case("")]
    #[case("kanji")]
    #[case("Hiragana")]
    #[case("hiragana; DROP TABLE characters")]
    fn test_未知の文字種はバリデーションエラー(#[case] input: &str) {
        assert!(matches!(
            AlphabetType::parse(input),
            Err(DomainError::Validation(_))
        ));
    }

    #[rstest]
    #[case("")]
    #[case("japanese")]
    #[case("ENGLISH")]
    fn test_未知のロケールはバリデーションエラー(#[case] input: &str) {
        assert!(matches!(Locale::parse(input), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_文字種のdisplayは小文字() {
        assert_eq!(AlphabetType::Katakana.to_string(), "katakana");
        assert_eq!(Locale::Russian.to_string(), "russian");
    }

    // =========================================================================
    // RowColumnKey のテスト
    // =========================================================================

    #[rstest]
    #[case("a")]
    #[case("i")]
    #[case("u")]
    #[case("e")]
    #[case("o")]
    fn test_母音キーは段として分類される(#[case] key: &str) {
        let parsed = RowColumnKey::parse(key).unwrap();
        assert!(parsed.is_vowel());
        assert_eq!(parsed.as_str(), key);
    }

    #[rstest]
    #[case("k")]
    #[case("s")]
    #[case("n")]
    #[case("sh")]
    #[case("A")]
    fn test_母音以外のキーは行として分類される(#[case] key: &str) {
        let parsed = RowColumnKey::parse(key).unwrap();
        assert_eq!(parsed, RowColumnKey::Consonant(key.to_string()));
    }

    #[test]
    fn test_キーの前後の空白は取り除かれる() {
        assert_eq!(
            RowColumnKey::parse("  k ").unwrap(),
            RowColumnKey::Consonant("k".to_string())
        );
    }

    #[test]
    fn test_空のキーはバリデーションエラー() {
        assert!(matches!(
            RowColumnKey::parse("   "),
            Err(DomainError::Validation(_))
        ));
    }

    // =========================================================================
    // Character のテスト
    // =========================================================================

    #[test]
    fn test_英語ロケールではenglish_readingだけが埋まる() {
        let character = Character::from_db(
            CharacterId::new(6),
            "k".to_string(),
            "a".to_string(),
            Some("か".to_string()),
            Some("カ".to_string()),
            Locale::English,
            "ka".to_string(),
        );

        assert_eq!(character.english_reading.as_deref(), Some("ka"));
        assert_eq!(character.russian_reading, None);
    }

    #[test]
    fn test_ロシア語ロケールではrussian_readingだけが埋まりjsonに片方だけ出る() {
        let character = Character::from_db(
            CharacterId::new(6),
            "k".to_string(),
            "a".to_string(),
            Some("か".to_string()),
            Some("カ".to_string()),
            Locale::Russian,
            "ка".to_string(),
        );
        let json = serde_json::to_value(&character).unwrap();

        assert_eq!(json["russianReading"], "ка");
        assert!(json.get("englishReading").is_none());
        assert_eq!(json["hiragana"], "か");
        assert_eq!(json["katakana"], "カ");
    }

    #[rstest]
    #[case(Locale::English)]
    #[case(Locale::Russian)]
    fn test_読みが空の行でも要求ロケールの読みだけが埋まる(#[case] locale: Locale) {
        let character = Character::from_db(
            CharacterId::new(47),
            String::new(),
            String::new(),
            Some("ゔ".to_string()),
            None,
            locale,
            String::new(),
        );

        let (requested, other) = match locale {
            Locale::English => (&character.english_reading, &character.russian_reading),
            Locale::Russian => (&character.russian_reading, &character.english_reading),
        };
        assert_eq!(requested.as_deref(), Some(""));
        assert_eq!(*other, None);
    }

    // =========================================================================
    // CharacterResponse のテスト
    // =========================================================================

    #[test]
    fn test_一覧では空の子音は省略され母音は残る() {
        let response = CharacterResponse::from_listing(
            CharacterId::new(1),
            Some(String::new()),
            Some("a".to_string()),
            "あ".to_string(),
            "a".to_string(),
        );
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "vowel": "a",
                "character": "あ",
                "reading": "a"
            })
        );
    }

    #[test]
    fn test_一覧では両方の分類子を持つ行はそのまま載る() {
        let response = CharacterResponse::from_listing(
            CharacterId::new(6),
            Some("k".to_string()),
            Some("a".to_string()),
            "か".to_string(),
            "ka".to_string(),
        );

        assert_eq!(response.consonant.as_deref(), Some("k"));
        assert_eq!(response.vowel.as_deref(), Some("a"));
    }

    #[test]
    fn test_段フィルタではvowelだけが載りconsonantは出力されない() {
        let key = RowColumnKey::parse("a").unwrap();
        let response = CharacterResponse::from_row_column(
            CharacterId::new(6),
            &key,
            "か".to_string(),
            "ka".to_string(),
        );
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["vowel"], "a");
        assert!(json.get("consonant").is_none());
    }

    #[test]
    fn test_行フィルタではconsonantだけが載りvowelは出力されない() {
        let key = RowColumnKey::parse("k").unwrap();
        let response = CharacterResponse::from_row_column(
            CharacterId::new(7),
            &key,
            "き".to_string(),
            "ki".to_string(),
        );
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["consonant"], "k");
        assert!(json.get("vowel").is_none());
    }

    #[test]
    fn test_省略されたフィールドはデシリアライズでnoneに戻る() {
        let json = r#"{"id": 7, "consonant": "k", "character": "き", "reading": "ki"}"#;
        let response: CharacterResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.consonant.as_deref(), Some("k"));
        assert_eq!(response.vowel, None);
    }
}
