//! # ログ出力の初期化
//!
//! Core API のトレーシング購読者を組み立てる。
//!
//! | 環境変数 | 役割 | 未設定時 |
//! |----------|------|----------|
//! | `LOG_FORMAT` | `json`（集約基盤向け）/ `pretty`（ローカル開発向け） | `pretty` |
//! | `RUST_LOG` | `EnvFilter` のディレクティブ | [`DEFAULT_FILTER`] |
//!
//! 購読者には `tracing_error::ErrorLayer` を登録する。リポジトリのメソッドは
//! `tracing::instrument` のスパン内で動くため、インフラ層エラーが捕捉する
//! `SpanTrace` には失敗した操作の名前と文字種・ロケール・件数が残る。

/// `RUST_LOG` 未設定時のフィルタ
///
/// ワークスペースのクレート（`kana_infra`, `kana_core_api` など）は debug、
/// それ以外（sqlx, tower_http など）は info。
pub const DEFAULT_FILTER: &str = "info,kana=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON
    Json,
    /// 人が読むための複数行出力
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する
    ///
    /// 大文字小文字と前後の空白は無視する。未知の値は `None`。
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// 起動ログに載せるサービス名
    pub service_name:    String,
    pub log_format:      LogFormat,
    /// 未知の `LOG_FORMAT` の値（購読者の初期化後に警告する）
    pub rejected_format: Option<String>,
}

impl TracingConfig {
    /// プロセス環境変数から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// 任意の検索関数から設定を読み取る
    ///
    /// `LOG_FORMAT` が未知の値なら `Pretty` にして、その値を
    /// `rejected_format` に残す。
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let raw = lookup("LOG_FORMAT").filter(|value| !value.trim().is_empty());
        let (log_format, rejected_format) = match raw {
            None => (LogFormat::default(), None),
            Some(value) => match LogFormat::parse(&value) {
                Some(format) => (format, None),
                None => (LogFormat::default(), Some(value)),
            },
        };

        Self {
            service_name: service_name.into(),
            log_format,
            rejected_format,
        }
    }
}

/// トレーシングを初期化する
///
/// 購読者がすでに登録されていればエラーを返す。
#[cfg(feature = "observability")]
pub fn init_tracing(
    config: TracingConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    // JSON ではリクエストのスパン（TraceLayer）をイベントに同梱する
    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init()?;

    tracing::info!(
        service = %config.service_name,
        format = ?config.log_format,
        "ログ出力を初期化しました"
    );
    if let Some(value) = &config.rejected_format {
        tracing::warn!(value = %value, "未知の LOG_FORMAT のため pretty で出力します");
    }
    Ok(())
}
