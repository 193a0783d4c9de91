//! # インフラ層エラー定義
//!
//! データベースとの通信や問題項目の組み立てで発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Query, Scan, Iteration, InsufficientData）
//!
//! リポジトリの各メソッドは `tracing::instrument` のスパン内で実行されるため、
//! エラー生成時に捕捉される `SpanTrace` には操作名とパラメータ（文字種、ロケール、
//! ID、出題数など）が記録される。
//!
//! ## sqlx エラーの分類
//!
//! | sqlx エラー | 発生タイミング | 種別 |
//! |------------|---------------|------|
//! | `ColumnDecode` / `ColumnNotFound` / `ColumnIndexOutOfBounds` / `Decode` / `TypeNotFound` | いつでも | `Scan` |
//! | その他 | 1 行目を受け取る前 | `Query` |
//! | その他 | 1 行以上受け取った後 | `Iteration` |

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
/// `From<sqlx::Error>` や convenience constructor でエラーを生成すると、
/// その時点のスパン情報が自動的にキャプチャされる。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// クエリエラー
    ///
    /// 接続失敗、SQL の構文エラー、制約違反などでデータストアがクエリを拒否した。
    #[error("クエリエラー: {0}")]
    Query(#[source] sqlx::Error),

    /// スキャンエラー
    ///
    /// 返された行を期待する形にデコードできなかった（型不一致、列の欠落）。
    #[error("行のデコードに失敗しました: {0}")]
    Scan(#[source] sqlx::Error),

    /// 結果ストリームのエラー
    ///
    /// 一部の行を読み進めた後で結果ストリームがエラーを報告した。
    #[error("結果の読み取り中にエラーが発生しました（{consumed} 行目以降）: {source}")]
    Iteration {
        /// エラー発生までに読み取った行数
        consumed: usize,
        #[source]
        source:   sqlx::Error,
    },

    /// 誤答候補の不足
    ///
    /// 読みテストの全問に誤答を割り当てるのに必要な行数が存在しなかった。
    #[error("誤答候補が不足しています: 必要 {required} 件、取得 {available} 件")]
    InsufficientData {
        /// 必要な誤答候補の数（出題数 × 誤答数）
        required:  usize,
        /// 実際に取得できた誤答候補の数
        available: usize,
    },
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 誤答候補不足かどうか
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self.kind, InfraErrorKind::InsufficientData { .. })
    }

    // ===== Convenience constructors =====

    /// 結果ストリームから受け取った sqlx エラーを分類する
    ///
    /// `consumed` はエラーまでに受け取った行数。
    pub fn from_stream(source: sqlx::Error, consumed: usize) -> Self {
        let kind = if is_decode_error(&source) {
            InfraErrorKind::Scan(source)
        } else if consumed > 0 {
            InfraErrorKind::Iteration { consumed, source }
        } else {
            InfraErrorKind::Query(source)
        };

        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    /// 誤答候補不足エラーを生成する
    pub fn insufficient_data(required: usize, available: usize) -> Self {
        Self {
            kind:       InfraErrorKind::InsufficientData {
                required,
                available,
            },
            span_trace: SpanTrace::capture(),
        }
    }
}

fn is_decode_error(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. }
    )
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

/// 単発のクエリ（`fetch_optional` など）で発生した sqlx エラーを分類する
impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self::from_stream(source, 0)
    }
}
