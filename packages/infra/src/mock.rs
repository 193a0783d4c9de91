//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! kana-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 無作為抽出の代わりに登録順で先頭から取り出すため、結果は決定的になる。

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use futures::stream;
use kana_domain::{
    character::{AlphabetType, Character, CharacterId, CharacterResponse, Locale, RowColumnKey},
    quiz::{QuizCandidate, QuizCount, ReadingTestItem, WritingTestItem},
};

use crate::{
    error::InfraError,
    repository::{CharacterRepository, character_repository::assign_wrong_options},
};

/// モックに登録する 1 行分のデータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanaRecord {
    pub id:              i32,
    pub consonant:       String,
    pub vowel:           String,
    pub hiragana:        Option<String>,
    pub katakana:        Option<String>,
    pub english_reading: Option<String>,
    pub russian_reading: Option<String>,
}

impl KanaRecord {
    /// 全列が埋まった行を作成する
    pub fn new(
        id: i32,
        consonant: &str,
        vowel: &str,
        hiragana: &str,
        katakana: &str,
        english: &str,
        russian: &str,
    ) -> Self {
        Self {
            id,
            consonant: consonant.to_string(),
            vowel: vowel.to_string(),
            hiragana: Some(hiragana.to_string()),
            katakana: Some(katakana.to_string()),
            english_reading: Some(english.to_string()),
            russian_reading: Some(russian.to_string()),
        }
    }

    fn glyph(&self, alphabet: AlphabetType) -> Option<&str> {
        match alphabet {
            AlphabetType::Hiragana => self.hiragana.as_deref(),
            AlphabetType::Katakana => self.katakana.as_deref(),
        }
    }

    fn reading(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::English => self.english_reading.as_deref(),
            Locale::Russian => self.russian_reading.as_deref(),
        }
    }

    fn candidate(&self, alphabet: AlphabetType, locale: Locale) -> Option<QuizCandidate> {
        let glyph = self.glyph(alphabet).filter(|g| !g.is_empty())?;
        let reading = self.reading(locale).filter(|r| !r.is_empty())?;
        Some(QuizCandidate {
            id:      CharacterId::new(self.id),
            glyph:   glyph.to_string(),
            reading: reading.to_string(),
        })
    }
}

/// データアクセス失敗を模擬する種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// 1 行目より前で失敗する
    Query,
    /// 行のデコードに失敗する
    Scan,
    /// 行を読み進めた後で失敗する
    Iteration,
}

impl MockFailure {
    /// 種別に対応するインフラ層エラーを生成する
    pub fn into_error(self) -> InfraError {
        match self {
            Self::Query => InfraError::from_stream(sqlx::Error::PoolTimedOut, 0),
            Self::Scan => InfraError::from_stream(
                sqlx::Error::ColumnNotFound("reading".to_string()),
                0,
            ),
            Self::Iteration => InfraError::from_stream(
                sqlx::Error::Protocol("接続が切断されました".to_string()),
                1,
            ),
        }
    }
}

// ===== MockCharacterRepository =====

#[derive(Clone, Default)]
pub struct MockCharacterRepository {
    records: Arc<Mutex<Vec<KanaRecord>>>,
    failure: Arc<Mutex<Option<MockFailure>>>,
    calls:   Arc<AtomicUsize>,
}

impl MockCharacterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<KanaRecord>) -> Self {
        let repo = Self::new();
        for record in records {
            repo.add_record(record);
        }
        repo
    }

    pub fn add_record(&self, record: KanaRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// 以降の呼び出しを指定の種別で失敗させる
    pub fn fail_with(&self, failure: MockFailure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    /// リポジトリが呼び出された回数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<Vec<KanaRecord>, InfraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = *self.failure.lock().unwrap() {
            return Err(failure.into_error());
        }
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    fn candidates(
        records: &[KanaRecord],
        alphabet: AlphabetType,
        locale: Locale,
        count: QuizCount,
    ) -> Vec<QuizCandidate> {
        records
            .iter()
            .filter_map(|r| r.candidate(alphabet, locale))
            .take(count.limit())
            .collect()
    }

    /// 正解字形を除いた誤答候補（字形の重複は除く）
    fn distractors(
        records: &[KanaRecord],
        alphabet: AlphabetType,
        locale: Locale,
        exclusions: &[String],
    ) -> Vec<String> {
        let mut glyphs: Vec<String> = Vec::new();
        for candidate in records.iter().filter_map(|r| r.candidate(alphabet, locale)) {
            if !exclusions.contains(&candidate.glyph) && !glyphs.contains(&candidate.glyph) {
                glyphs.push(candidate.glyph);
            }
        }
        glyphs
    }
}

#[async_trait]
impl CharacterRepository for MockCharacterRepository {
    async fn find_all(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
    ) -> Result<Vec<CharacterResponse>, InfraError> {
        Ok(self
            .begin()?
            .into_iter()
            .map(|r| {
                CharacterResponse::from_listing(
                    CharacterId::new(r.id),
                    Some(r.consonant.clone()),
                    Some(r.vowel.clone()),
                    r.glyph(alphabet).unwrap_or_default().to_string(),
                    r.reading(locale).unwrap_or_default().to_string(),
                )
            })
            .collect())
    }

    async fn find_by_row_column(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        key: &RowColumnKey,
    ) -> Result<Vec<CharacterResponse>, InfraError> {
        Ok(self
            .begin()?
            .into_iter()
            .filter(|r| r.consonant == key.as_str() || r.vowel == key.as_str())
            .map(|r| {
                CharacterResponse::from_row_column(
                    CharacterId::new(r.id),
                    key,
                    r.glyph(alphabet).unwrap_or_default().to_string(),
                    r.reading(locale).unwrap_or_default().to_string(),
                )
            })
            .collect())
    }

    async fn find_by_id(
        &self,
        id: CharacterId,
        locale: Locale,
    ) -> Result<Option<Character>, InfraError> {
        Ok(self
            .begin()?
            .into_iter()
            .find(|r| r.id == id.as_i32())
            .map(|r| {
                let reading = r.reading(locale).unwrap_or_default().to_string();
                Character::from_db(
                    CharacterId::new(r.id),
                    r.consonant,
                    r.vowel,
                    r.hiragana,
                    r.katakana,
                    locale,
                    reading,
                )
            }))
    }

    async fn random_reading_test(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        count: QuizCount,
    ) -> Result<Vec<ReadingTestItem>, InfraError> {
        let records = self.begin()?;
        let candidates = Self::candidates(&records, alphabet, locale, count);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let exclusions: Vec<String> = candidates.iter().map(|c| c.glyph.clone()).collect();
        let distractors = Self::distractors(&records, alphabet, locale, &exclusions);

        assign_wrong_options(
            candidates,
            stream::iter(distractors.into_iter().map(Ok::<_, sqlx::Error>)),
        )
        .await
    }

    async fn random_writing_test(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        count: QuizCount,
    ) -> Result<Vec<WritingTestItem>, InfraError> {
        let records = self.begin()?;
        Ok(Self::candidates(&records, alphabet, locale, count)
            .into_iter()
            .map(QuizCandidate::into_writing_item)
            .collect())
    }
}
