//! # characters テーブルの SQL 組み立て
//!
//! 文字種とロケールに応じて参照する列が変わるため、SQL はコンパイル時検証の
//! マクロではなく実行時に組み立てる。埋め込むのは
//! [`AlphabetType::glyph_column`] / [`Locale::reading_column`] が返す固定の列名だけで、
//! ID・キー・件数・除外リストはすべてバインドパラメータ（`$1`）で渡す。

use kana_domain::character::{AlphabetType, Locale};

/// 全件一覧（ID 昇順）
pub(crate) fn list_all(alphabet: AlphabetType, locale: Locale) -> String {
    format!(
        "SELECT id, consonant, vowel, COALESCE({glyph}, '') AS character, \
         COALESCE({reading}, '') AS reading \
         FROM characters ORDER BY id ASC",
        glyph = alphabet.glyph_column(),
        reading = locale.reading_column(),
    )
}

/// 行・段フィルタ（`$1` = キー、ID 昇順）
pub(crate) fn list_by_row_column(alphabet: AlphabetType, locale: Locale) -> String {
    format!(
        "SELECT id, COALESCE({glyph}, '') AS character, \
         COALESCE({reading}, '') AS reading \
         FROM characters WHERE consonant = $1 OR vowel = $1 ORDER BY id ASC",
        glyph = alphabet.glyph_column(),
        reading = locale.reading_column(),
    )
}

/// ID 指定の詳細取得（`$1` = ID）
pub(crate) fn find_by_id(locale: Locale) -> String {
    format!(
        "SELECT id, consonant, vowel, hiragana, katakana, \
         COALESCE({reading}, '') AS reading \
         FROM characters WHERE id = $1",
        reading = locale.reading_column(),
    )
}

/// 出題候補の無作為抽出（`$1` = 件数）
pub(crate) fn quiz_candidates(alphabet: AlphabetType, locale: Locale) -> String {
    format!(
        "SELECT id, {glyph} AS glyph, {reading} AS reading \
         FROM characters WHERE {eligible} ORDER BY RANDOM() LIMIT $1",
        glyph = alphabet.glyph_column(),
        reading = locale.reading_column(),
        eligible = eligible(alphabet, locale),
    )
}

/// 誤答候補の無作為抽出（`$1` = 正解字形の配列）
///
/// 件数は制限しない。呼び出し側は必要数だけ読んでストリームを破棄する。
pub(crate) fn distractors(alphabet: AlphabetType, locale: Locale) -> String {
    format!(
        "SELECT glyph FROM (\
         SELECT DISTINCT {glyph} AS glyph FROM characters \
         WHERE {eligible} AND NOT ({glyph} = ANY($1))\
         ) AS candidates ORDER BY RANDOM()",
        glyph = alphabet.glyph_column(),
        eligible = eligible(alphabet, locale),
    )
}

/// 字形と読みの両方が NULL でも空でもない行
fn eligible(alphabet: AlphabetType, locale: Locale) -> String {
    let glyph = alphabet.glyph_column();
    let reading = locale.reading_column();
    format!(
        "{glyph} IS NOT NULL AND {glyph} <> '' AND {reading} IS NOT NULL AND {reading} <> ''"
    )
}
