//! # PurgeFlow インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プールとトランザクション管理
//! - **スキーマ解決**: DocType メタデータの読み取り
//! - **削除実行**: メタデータで解決したテーブルと、特別経路のテーブルの行削除
//! - **キャッシュ無効化**: Redis 上の通知件数キャッシュの削除
//!
//! ## 依存関係
//!
//! ```text
//! core-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続プールとトランザクション
//! - [`redis`] - Redis 接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`sql`] - 動的 SQL の識別子引用と LIKE エスケープ
//! - [`repository`] - 会社・ロール・スキーマ・採番シリーズのリポジトリ
//! - [`deletion`] - 取引データ削除の実行
//! - [`notification_cache`] - 通知件数キャッシュの無効化
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use purgeflow_infra::{db, redis};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/erp").await?;
//!     let redis = redis::create_connection_manager("redis://localhost").await?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod deletion;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification_cache;
pub mod redis;
pub mod repository;
pub mod sql;

pub use error::{InfraError, InfraErrorKind};
