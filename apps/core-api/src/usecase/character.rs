//! 文字参照・テスト生成ユースケース
//!
//! リクエストの文字列パラメータを検証してからリポジトリを呼び出す。
//! 検証に失敗した場合はクエリを一切発行しない。

use std::sync::Arc;

use kana_domain::{
    DomainError,
    character::{AlphabetType, Character, CharacterId, CharacterResponse, Locale, RowColumnKey},
    quiz::{QuizCount, ReadingTestItem, WritingTestItem},
};
use kana_infra::repository::CharacterRepository;

use crate::error::CoreError;

/// 文字参照・テスト生成ユースケース
pub struct CharacterUseCaseImpl {
    character_repository: Arc<dyn CharacterRepository>,
}

impl CharacterUseCaseImpl {
    pub fn new(character_repository: Arc<dyn CharacterRepository>) -> Self {
        Self {
            character_repository,
        }
    }

    /// 全件一覧
    pub async fn list_all(
        &self,
        alphabet_type: &str,
        locale: &str,
    ) -> Result<Vec<CharacterResponse>, CoreError> {
        let (alphabet, locale) = parse_selection(alphabet_type, locale)?;

        let characters = self.character_repository.find_all(alphabet, locale).await?;
        tracing::debug!(count = characters.len(), "文字一覧を取得しました");
        Ok(characters)
    }

    /// 行・段での絞り込み
    pub async fn list_by_row_column(
        &self,
        alphabet_type: &str,
        locale: &str,
        key: &str,
    ) -> Result<Vec<CharacterResponse>, CoreError> {
        let (alphabet, locale) = parse_selection(alphabet_type, locale)?;
        let key = RowColumnKey::parse(key)?;

        let characters = self
            .character_repository
            .find_by_row_column(alphabet, locale, &key)
            .await?;
        Ok(characters)
    }

    /// ID 指定の詳細取得
    ///
    /// 該当行がなければ [`CoreError::NotFound`]。
    pub async fn get_by_id(&self, id: &str, locale: &str) -> Result<Character, CoreError> {
        let locale = Locale::parse(locale)?;
        let id = parse_id(id)?;

        self.character_repository
            .find_by_id(id, locale)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound {
                    entity_type: "文字",
                    id:          id.to_string(),
                }
                .into()
            })
    }

    /// 読みテスト
    pub async fn reading_test(
        &self,
        alphabet_type: &str,
        locale: &str,
        count: Option<&str>,
    ) -> Result<Vec<ReadingTestItem>, CoreError> {
        let (alphabet, locale) = parse_selection(alphabet_type, locale)?;
        let count = parse_count(count)?;

        let items = self
            .character_repository
            .random_reading_test(alphabet, locale, count)
            .await?;
        tracing::debug!(items = items.len(), "読みテストを生成しました");
        Ok(items)
    }

    /// 書きテスト
    pub async fn writing_test(
        &self,
        alphabet_type: &str,
        locale: &str,
        count: Option<&str>,
    ) -> Result<Vec<WritingTestItem>, CoreError> {
        let (alphabet, locale) = parse_selection(alphabet_type, locale)?;
        let count = parse_count(count)?;

        let items = self
            .character_repository
            .random_writing_test(alphabet, locale, count)
            .await?;
        tracing::debug!(items = items.len(), "書きテストを生成しました");
        Ok(items)
    }
}

fn parse_selection(alphabet_type: &str, locale: &str) -> Result<(AlphabetType, Locale), CoreError> {
    Ok((AlphabetType::parse(alphabet_type)?, Locale::parse(locale)?))
}

fn parse_id(raw: &str) -> Result<CharacterId, CoreError> {
    raw.trim()
        .parse::<i32>()
        .map(CharacterId::new)
        .map_err(|_| CoreError::BadRequest(format!("不正な id です: {raw:?}")))
}

/// 出題数の文字列を解釈する（未指定・空はデフォルト値）
fn parse_count(raw: Option<&str>) -> Result<QuizCount, CoreError> {
    let value = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Some(
            s.parse::<i64>()
                .map_err(|_| CoreError::BadRequest(format!("不正な count です: {s:?}")))?,
        ),
        None => None,
    };
    QuizCount::from_request(value).map_err(CoreError::from)
}

#[cfg(test)]
mod tests {
    use kana_infra::mock::{KanaRecord, MockCharacterRepository, MockFailure};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn records() -> Vec<KanaRecord> {
        vec![
            KanaRecord::new(1, "", "a", "あ", "ア", "a", "а"),
            KanaRecord::new(2, "", "i", "い", "イ", "i", "и"),
            KanaRecord::new(6, "k", "a", "か", "カ", "ka", "ка"),
            KanaRecord::new(7, "k", "i", "き", "キ", "ki", "ки"),
            KanaRecord::new(11, "s", "a", "さ", "サ", "sa", "са"),
            KanaRecord::new(12, "s", "i", "し", "シ", "shi", "си"),
        ]
    }

    fn sut(repo: &MockCharacterRepository) -> CharacterUseCaseImpl {
        CharacterUseCaseImpl::new(Arc::new(repo.clone()))
    }

    // ===== 検証 =====

    #[rstest]
    #[case("kanji", "english")]
    #[case("hiragana", "japanese")]
    #[case("", "")]
    #[tokio::test]
    async fn test_不正な文字種やロケールではクエリを発行しない(
        #[case] alphabet_type: &str,
        #[case] locale: &str,
    ) {
        let repo = MockCharacterRepository::with_records(records());
        let sut = sut(&repo);

        let results = [
            sut.list_all(alphabet_type, locale).await.err(),
            sut.list_by_row_column(alphabet_type, locale, "k").await.err(),
            sut.reading_test(alphabet_type, locale, Some("1")).await.err(),
            sut.writing_test(alphabet_type, locale, None).await.err(),
        ];

        for result in results {
            assert!(matches!(result, Some(CoreError::BadRequest(_))));
        }
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_詳細取得は不正なロケールでクエリを発行しない() {
        let repo = MockCharacterRepository::with_records(records());

        let result = sut(&repo).get_by_id("1", "french").await;

        assert!(matches!(result, Err(CoreError::BadRequest(_))));
        assert_eq!(repo.calls(), 0);
    }

    #[rstest]
    #[case("abc")]
    #[case("1.5")]
    #[case("-1")]
    #[case("99999999999999999999")]
    #[tokio::test]
    async fn test_不正な出題数ではクエリを発行しない(#[case] count: &str) {
        let repo = MockCharacterRepository::with_records(records());

        let result = sut(&repo)
            .writing_test("hiragana", "english", Some(count))
            .await;

        assert!(matches!(result, Err(CoreError::BadRequest(_))));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_空のキーではクエリを発行しない() {
        let repo = MockCharacterRepository::with_records(records());

        let result = sut(&repo)
            .list_by_row_column("hiragana", "english", " ")
            .await;

        assert!(matches!(result, Err(CoreError::BadRequest(_))));
        assert_eq!(repo.calls(), 0);
    }

    // ===== 正常系 =====

    #[tokio::test]
    async fn test_全件一覧をid順に返す() {
        let repo = MockCharacterRepository::with_records(records());

        let characters = sut(&repo).list_all("katakana", "russian").await.unwrap();

        let ids: Vec<i32> = characters.iter().map(|c| c.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 6, 7, 11, 12]);
        assert_eq!(characters[2].character, "カ");
        assert_eq!(characters[2].reading, "ка");
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_存在しないidはnot_foundになる() {
        let repo = MockCharacterRepository::with_records(records());

        let result = sut(&repo).get_by_id("99", "english").await;

        assert!(matches!(result, Err(CoreError::NotFound(_))));
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_出題数未指定ならデフォルト値で候補数だけ返す() {
        let repo = MockCharacterRepository::with_records(records());

        let items = sut(&repo)
            .writing_test("hiragana", "english", None)
            .await
            .unwrap();

        // 6 行しかないためデフォルト値 10 件に満たない
        assert_eq!(items.len(), 6);
    }

    #[tokio::test]
    async fn test_行数を超える出題数は上限なく受け付けて候補数だけ返す() {
        let repo = MockCharacterRepository::with_records(records());

        let items = sut(&repo)
            .writing_test("hiragana", "english", Some("1000"))
            .await
            .unwrap();

        assert_eq!(items.len(), 6);
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_出題数0の書きテストは空の結果になる() {
        let repo = MockCharacterRepository::with_records(records());

        let items = sut(&repo)
            .writing_test("hiragana", "english", Some("0"))
            .await
            .unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_読みテストの誤答は正解と重ならない() {
        let repo = MockCharacterRepository::with_records(records());

        let items = sut(&repo)
            .reading_test("hiragana", "english", Some("2"))
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        for item in &items {
            for wrong in &item.wrong_options {
                assert!(items.iter().all(|i| &i.correct_char != wrong));
            }
        }
    }

    // ===== 異常系 =====

    #[tokio::test]
    async fn test_誤答候補が足りなければdatabaseエラーになる() {
        let repo = MockCharacterRepository::with_records(records());

        // 3 問 × 2 = 6 件必要だが、除外後は 3 件しか残らない
        let result = sut(&repo)
            .reading_test("hiragana", "english", Some("3"))
            .await;

        assert!(matches!(
            result,
            Err(CoreError::Database(ref e)) if e.is_insufficient_data()
        ));
    }

    #[rstest]
    #[case(MockFailure::Query)]
    #[case(MockFailure::Scan)]
    #[case(MockFailure::Iteration)]
    #[tokio::test]
    async fn test_データアクセスの失敗はdatabaseエラーとして伝播する(#[case] failure: MockFailure) {
        let repo = MockCharacterRepository::with_records(records());
        repo.fail_with(failure);

        let result = sut(&repo).list_all("hiragana", "english").await;

        assert!(matches!(result, Err(CoreError::Database(_))));
    }
}
