//! # CharacterRepository
//!
//! `characters` テーブルの読み取りと、読み・書きテストの組み立てを担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: 書き込みは行わない。呼び出しごとにプールから接続を借り、
//!   ストリームのドロップで返却する
//! - **列の選択**: 文字種とロケールから参照列を決め、SQL は [`character_sql`] で組み立てる
//! - **二段階の読みテスト**: 正解候補を取得した後、正解字形を除外した誤答ストリームから
//!   1 問あたり [`WRONG_OPTION_COUNT`] 件ずつ読み進める。途中で尽きた場合は部分結果を返さず
//!   [`InfraErrorKind::InsufficientData`](crate::error::InfraErrorKind::InsufficientData)
//!
//! [`character_sql`]: super::character_sql

use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use kana_domain::{
    character::{AlphabetType, Character, CharacterId, CharacterResponse, Locale, RowColumnKey},
    quiz::{QuizCandidate, QuizCount, ReadingTestItem, WRONG_OPTION_COUNT, WritingTestItem},
};
use sqlx::PgPool;

use super::character_sql;
use crate::error::InfraError;

/// 文字リポジトリトレイト
///
/// 文字種・ロケールは検証済みの列挙型で受け取る。
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// 全件を ID 昇順で取得する
    async fn find_all(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
    ) -> Result<Vec<CharacterResponse>, InfraError>;

    /// 子音または母音がキーに一致する文字を ID 昇順で取得する
    async fn find_by_row_column(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        key: &RowColumnKey,
    ) -> Result<Vec<CharacterResponse>, InfraError>;

    /// ID で文字を検索する
    async fn find_by_id(
        &self,
        id: CharacterId,
        locale: Locale,
    ) -> Result<Option<Character>, InfraError>;

    /// 読みテストを無作為に組み立てる
    async fn random_reading_test(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        count: QuizCount,
    ) -> Result<Vec<ReadingTestItem>, InfraError>;

    /// 書きテストを無作為に組み立てる
    async fn random_writing_test(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        count: QuizCount,
    ) -> Result<Vec<WritingTestItem>, InfraError>;
}

// =============================================================================
// 行の型
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id:        i32,
    consonant: Option<String>,
    vowel:     Option<String>,
    character: String,
    reading:   String,
}

#[derive(Debug, sqlx::FromRow)]
struct RowColumnRow {
    id:        i32,
    character: String,
    reading:   String,
}

#[derive(Debug, sqlx::FromRow)]
struct DetailRow {
    id:        i32,
    consonant: Option<String>,
    vowel:     Option<String>,
    hiragana:  Option<String>,
    katakana:  Option<String>,
    reading:   String,
}

#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
    id:      i32,
    glyph:   String,
    reading: String,
}

impl From<CandidateRow> for QuizCandidate {
    fn from(row: CandidateRow) -> Self {
        Self {
            id:      CharacterId::new(row.id),
            glyph:   row.glyph,
            reading: row.reading,
        }
    }
}

// =============================================================================
// PostgresCharacterRepository
// =============================================================================

/// PostgreSQL 実装の CharacterRepository
#[derive(Debug, Clone)]
pub struct PostgresCharacterRepository {
    pool: PgPool,
}

impl PostgresCharacterRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 出題候補を取得する（読み・書きテスト共通の第一段階）
    async fn fetch_candidates(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        count: QuizCount,
    ) -> Result<Vec<QuizCandidate>, InfraError> {
        let sql = character_sql::quiz_candidates(alphabet, locale);
        let rows: Vec<CandidateRow> = drain_rows(
            sqlx::query_as::<_, CandidateRow>(&sql)
                .bind(count.as_i64())
                .fetch(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(QuizCandidate::from).collect())
    }
}

#[async_trait]
impl CharacterRepository for PostgresCharacterRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%alphabet, %locale))]
    async fn find_all(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
    ) -> Result<Vec<CharacterResponse>, InfraError> {
        let sql = character_sql::list_all(alphabet, locale);
        let rows = drain_rows(sqlx::query_as::<_, ListingRow>(&sql).fetch(&self.pool)).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                CharacterResponse::from_listing(
                    CharacterId::new(row.id),
                    row.consonant,
                    row.vowel,
                    row.character,
                    row.reading,
                )
            })
            .collect())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(%alphabet, %locale, key = key.as_str())
    )]
    async fn find_by_row_column(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        key: &RowColumnKey,
    ) -> Result<Vec<CharacterResponse>, InfraError> {
        let sql = character_sql::list_by_row_column(alphabet, locale);
        let rows = drain_rows(
            sqlx::query_as::<_, RowColumnRow>(&sql)
                .bind(key.as_str())
                .fetch(&self.pool),
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                CharacterResponse::from_row_column(
                    CharacterId::new(row.id),
                    key,
                    row.character,
                    row.reading,
                )
            })
            .collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %locale))]
    async fn find_by_id(
        &self,
        id: CharacterId,
        locale: Locale,
    ) -> Result<Option<Character>, InfraError> {
        let sql = character_sql::find_by_id(locale);
        let row = sqlx::query_as::<_, DetailRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Character::from_db(
            CharacterId::new(row.id),
            row.consonant.unwrap_or_default(),
            row.vowel.unwrap_or_default(),
            row.hiragana,
            row.katakana,
            locale,
            row.reading,
        )))
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(%alphabet, %locale, count = count.as_i64())
    )]
    async fn random_reading_test(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        count: QuizCount,
    ) -> Result<Vec<ReadingTestItem>, InfraError> {
        let candidates = self.fetch_candidates(alphabet, locale, count).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let exclusions: Vec<String> = candidates.iter().map(|c| c.glyph.clone()).collect();
        let sql = character_sql::distractors(alphabet, locale);
        let distractors = sqlx::query_scalar::<_, String>(&sql)
            .bind(exclusions)
            .fetch(&self.pool);

        assign_wrong_options(candidates, distractors).await
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(%alphabet, %locale, count = count.as_i64())
    )]
    async fn random_writing_test(
        &self,
        alphabet: AlphabetType,
        locale: Locale,
        count: QuizCount,
    ) -> Result<Vec<WritingTestItem>, InfraError> {
        let candidates = self.fetch_candidates(alphabet, locale, count).await?;

        Ok(candidates
            .into_iter()
            .map(QuizCandidate::into_writing_item)
            .collect())
    }
}

// =============================================================================
// ストリーム処理
// =============================================================================

/// 結果ストリームを最後まで読み、行を集める
///
/// エラーは読み取り済みの行数とともに分類される。
async fn drain_rows<T, S>(mut rows: S) -> Result<Vec<T>, InfraError>
where
    S: Stream<Item = Result<T, sqlx::Error>> + Unpin,
{
    let mut collected = Vec::new();
    while let Some(row) = rows
        .try_next()
        .await
        .map_err(|e| InfraError::from_stream(e, collected.len()))?
    {
        collected.push(row);
    }
    Ok(collected)
}

/// 候補の順に誤答を 2 件ずつ割り当てる
///
/// 全問に割り当て終えた時点で誤答ストリームをドロップし、残りは読まない。
pub(crate) async fn assign_wrong_options<S>(
    candidates: Vec<QuizCandidate>,
    mut distractors: S,
) -> Result<Vec<ReadingTestItem>, InfraError>
where
    S: Stream<Item = Result<String, sqlx::Error>> + Unpin,
{
    let required = candidates.len() * WRONG_OPTION_COUNT;
    let mut consumed = 0;
    let mut items = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let first = next_distractor(&mut distractors, &mut consumed, required).await?;
        let second = next_distractor(&mut distractors, &mut consumed, required).await?;
        items.push(candidate.into_reading_item([first, second]));
    }

    drop(distractors);
    tracing::debug!(items = items.len(), consumed, "読みテストを組み立てました");
    Ok(items)
}

async fn next_distractor<S>(
    distractors: &mut S,
    consumed: &mut usize,
    required: usize,
) -> Result<String, InfraError>
where
    S: Stream<Item = Result<String, sqlx::Error>> + Unpin,
{
    match distractors.try_next().await {
        Ok(Some(glyph)) => {
            *consumed += 1;
            Ok(glyph)
        }
        Ok(None) => Err(InfraError::insufficient_data(required, *consumed)),
        Err(e) => Err(InfraError::from_stream(e, *consumed)),
    }
}
