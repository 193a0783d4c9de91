//! # Core API 設定
//!
//! 環境変数から Core API サーバーの設定を読み込む。
//!
//! 読み込みは検索関数を受け取る [`CoreApiConfig::from_lookup`] に集約しており、
//! テストではプロセス環境を変更せずに任意の値を与えられる。

use std::{env, time::Duration};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 13001;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Core API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreApiConfig {
    /// バインドアドレス
    pub host:            String,
    /// ポート番号
    pub port:            u16,
    /// PostgreSQL 接続 URL（未設定なら `TEST_DB_*` から解決する）
    pub database_url:    Option<String>,
    /// リクエスト全体のタイムアウト
    pub request_timeout: Duration,
    /// 起動時にマイグレーションを適用するか
    pub run_migrations:  bool,
}

/// 設定値の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl CoreApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の検索関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let port = match get("CORE_API_PORT") {
            Some(value) => parse(&value, "CORE_API_PORT")?,
            None => DEFAULT_PORT,
        };
        let timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => parse(&value, "REQUEST_TIMEOUT_SECS")?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        let run_migrations = match get("RUN_MIGRATIONS") {
            Some(value) => parse_bool(&value, "RUN_MIGRATIONS")?,
            None => false,
        };

        Ok(Self {
            host: get("CORE_API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: get("DATABASE_URL"),
            request_timeout: Duration::from_secs(timeout_secs),
            run_migrations,
        })
    }
}

fn parse<T: std::str::FromStr>(value: &str, name: &'static str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(value: &str, name: &'static str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<CoreApiConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CoreApiConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_未設定ならデフォルト値になる() {
        let config = load(&[]).unwrap();

        assert_eq!(
            config,
            CoreApiConfig {
                host:            "0.0.0.0".to_string(),
                port:            13001,
                database_url:    None,
                request_timeout: Duration::from_secs(30),
                run_migrations:  false,
            }
        );
    }

    #[test]
    fn test_設定された値を読み込む() {
        let config = load(&[
            ("CORE_API_HOST", "127.0.0.1"),
            ("CORE_API_PORT", "3001"),
            ("DATABASE_URL", "postgres://localhost/kana"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("RUN_MIGRATIONS", "true"),
        ])
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/kana"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.run_migrations);
    }

    #[rstest]
    #[case("CORE_API_PORT", "http")]
    #[case("CORE_API_PORT", "70000")]
    #[case("REQUEST_TIMEOUT_SECS", "-1")]
    #[case("RUN_MIGRATIONS", "maybe")]
    fn test_不正な値はエラーになる(#[case] name: &'static str, #[case] value: &str) {
        let result = load(&[(name, value)]);

        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                name,
                value: value.to_string(),
            })
        );
    }

    #[test]
    fn test_空のdatabase_urlは未設定として扱う() {
        let config = load(&[("DATABASE_URL", "")]).unwrap();
        assert_eq!(config.database_url, None);
    }
}
