//! # Core API サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CORE_API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CORE_API_PORT` | No | ポート番号（デフォルト: `13001`） |
//! | `DATABASE_URL` | No | PostgreSQL 接続 URL。未設定なら `TEST_DB_*` から組み立てる |
//! | `TEST_DB_HOST` ほか | No | `TEST_DB_{HOST,PORT,USER,PASSWORD,NAME}` |
//! | `REQUEST_TIMEOUT_SECS` | No | リクエストのタイムアウト秒数（デフォルト: `30`） |
//! | `RUN_MIGRATIONS` | No | 起動時にマイグレーションを適用する（デフォルト: `false`） |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! RUN_MIGRATIONS=true cargo run -p kana-core-api
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use kana_core_api::{
    app::build_router,
    config::CoreApiConfig,
    handler::CharacterState,
    usecase::CharacterUseCaseImpl,
};
use kana_infra::{
    db::{self, DatabaseSettings},
    repository::{CharacterRepository, PostgresCharacterRepository},
};
use kana_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("core-api")).context("ログ出力の初期化に失敗しました")?;

    let config = CoreApiConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Core API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = match &config.database_url {
        Some(url) => db::create_pool(url)
            .await
            .context("データベースへの接続に失敗しました")?,
        None => {
            let settings = DatabaseSettings::from_env();
            tracing::info!(database = %settings, "TEST_DB_* の設定で接続します");
            db::create_pool_with(settings.connect_options())
                .await
                .context("データベースへの接続に失敗しました")?
        }
    };

    if config.run_migrations {
        db::run_migrations(&pool)
            .await
            .context("マイグレーションの適用に失敗しました")?;
        tracing::info!("マイグレーションを適用しました");
    }

    let character_repository: Arc<dyn CharacterRepository> =
        Arc::new(PostgresCharacterRepository::new(pool));
    let state = Arc::new(CharacterState {
        usecase: CharacterUseCaseImpl::new(character_repository),
    });

    let app = build_router(state, config.request_timeout);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Core API サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Core API サーバーを停止しました");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "シグナルの待ち受けに失敗しました");
    }
}
