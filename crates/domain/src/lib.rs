//! # PurgeFlow ドメイン層
//!
//! 会社（テナント）単位の取引データ削除に関わるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **値オブジェクト**: 会社名・DocType 名・フィールド名などを Newtype で表現し、
//!   生成時に検証する
//! - **純粋なルール**: 認可判定、削除対象外の DocType、採番シリーズの再計算ルールを
//!   I/O なしで表現する
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! core-service → infra → domain
//!         ↘        ↓
//!           shared
//! ```
//!
//! ドメイン層はインフラ層（DB、Redis）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`company`] - 会社エンティティと削除の認可判定
//! - [`doctype`] - DocType 記述子（スキーマメタデータ）
//! - [`error`] - ドメイン層エラー
//! - [`naming_series`] - 採番シリーズとカウンター再計算
//! - [`purge_policy`] - カスケード削除の対象外 DocType
//! - [`user`] - ユーザーと呼び出し元
//!
//! ## 使用例
//!
//! ```rust
//! use purgeflow_domain::{doctype::DocTypeName, purge_policy};
//!
//! let warehouse = DocTypeName::new("Warehouse").unwrap();
//! assert!(purge_policy::is_excluded(&warehouse));
//! ```

#[macro_use]
mod macros;

pub mod company;
pub mod doctype;
pub mod error;
pub mod naming_series;
pub mod purge_policy;
pub mod user;

pub use error::DomainError;
