//! # リポジトリ実装
//!
//! 削除処理が参照・更新するストアへのアクセスをトレイトとして定義し、
//! PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **トレイト境界**: ユースケース層はトレイト経由でのみ依存し、テストでは
//!   [`crate::mock`] のインメモリ実装に差し替える
//! - **読み取りと書き込みの分離**: 削除前の参照（会社・ロール）はプールを直接使い、
//!   削除中に使うもの（スキーマ・採番・行の削除）は [`crate::db::TxContext`] を必須引数に取る

pub mod company_repository;
pub mod naming_series_repository;
pub mod schema_registry;
pub mod user_role_repository;

pub use company_repository::{CompanyRepository, PostgresCompanyRepository};
pub use naming_series_repository::{NamingSeriesRepository, PostgresNamingSeriesRepository};
pub use schema_registry::{PostgresSchemaRegistry, SchemaRegistry};
pub use user_role_repository::{PostgresUserRoleRepository, UserRoleRepository};
