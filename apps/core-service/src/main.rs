//! # Core Service サーバー
//!
//! 会社単位の取引データ削除を実行する内部サービス。
//!
//! ## 役割
//!
//! - **取引データ削除**: スキーマメタデータを辿り、会社に属する行をカスケード削除する
//! - **採番シリーズの再設定**: 削除後に残った ID から採番カウンターを戻す
//! - **通知件数キャッシュのクリア**: 削除後に Redis 上の件数キャッシュを破棄する
//!
//! ## アクセス制御
//!
//! Core Service は内部ネットワークからのみアクセス可能とする。
//! 呼び出し元のユーザー ID はリクエストボディで受け取り、
//! ロールは `tabHas Role` から解決する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CORE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CORE_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `REDIS_URL` | No | Redis 接続 URL（未設定なら通知件数キャッシュをクリアしない） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! CORE_PORT=3001 DATABASE_URL=postgres://... cargo run -p purgeflow-core-service --release
//! ```

mod config;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use config::CoreConfig;
use purgeflow_core_service::{
    handler::{
        CompanyTransactionState,
        ReadinessState,
        delete_company_transactions,
        health_check,
        readiness_check,
    },
    usecase::CompanyTransactionUseCaseImpl,
};
use purgeflow_infra::{
    db::{self, PgTransactionManager},
    deletion::{DeletionRegistry, PostgresDocTypeRecordStore},
    notification_cache::{NoopNotificationCache, NotificationCache, RedisNotificationCache},
    redis::create_connection_manager,
    repository::{
        PostgresCompanyRepository,
        PostgresNamingSeriesRepository,
        PostgresSchemaRegistry,
        PostgresUserRoleRepository,
    },
};
use purgeflow_shared::observability::{TracingConfig, init_tracing, make_request_span};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Core Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("core-service");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing_config.root_span().entered();

    // 設定読み込み
    let config = CoreConfig::from_env()?;

    tracing::info!(
        "Core Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("データベースに接続しました");

    // Redis は任意。未設定なら通知件数キャッシュのクリアを行わない
    let redis_conn = match &config.redis_url {
        Some(url) => {
            let conn = create_connection_manager(url).await?;
            tracing::info!("Redis に接続しました");
            Some(conn)
        }
        None => {
            tracing::info!("REDIS_URL が未設定のため通知件数キャッシュのクリアは行いません");
            None
        }
    };
    let notification_cache: Arc<dyn NotificationCache> = match &redis_conn {
        Some(conn) => Arc::new(RedisNotificationCache::new(conn.clone())),
        None => Arc::new(NoopNotificationCache),
    };

    // Readiness Check 用 State
    let readiness_state = Arc::new(ReadinessState {
        pool: pool.clone(),
        redis_conn,
    });

    // 取引データ削除の依存コンポーネント
    let usecase = CompanyTransactionUseCaseImpl::new(
        Arc::new(PostgresCompanyRepository::new(pool.clone())),
        Arc::new(PostgresSchemaRegistry::new()),
        Arc::new(DeletionRegistry::with_special_deleters()),
        Arc::new(PostgresDocTypeRecordStore::new()),
        Arc::new(PostgresNamingSeriesRepository::new()),
        notification_cache,
        Arc::new(PgTransactionManager::new(pool.clone())),
    );
    let company_transaction_state = Arc::new(CompanyTransactionState {
        user_role_repository: Arc::new(PostgresUserRoleRepository::new(pool)),
        usecase,
    });

    // ルーター構築
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .route(
            "/internal/companies/{company_name}/transactions/delete",
            post(delete_company_transactions),
        )
        .with_state(company_transaction_state)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Core Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
