//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//! - **HTTP ステータスへのマッピング**: サービス層でステータスコードに変換可能
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値・メタデータの検証失敗 |
//! | `NotFound` | 404 Not Found | 会社・DocType が存在しない |
//! | `Forbidden` | 403 Forbidden | ロール不足・作成者以外による削除 |
//!
//! ## 使用例
//!
//! ```rust
//! use purgeflow_domain::DomainError;
//!
//! fn find_company(name: &str) -> Result<(), DomainError> {
//!     Err(DomainError::NotFound {
//!         entity_type: "Company",
//!         id:          name.to_string(),
//!     })
//! }
//!
//! assert!(find_company("Acme").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値やメタデータ上の名前がルールに違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - 会社名が空
    /// - DocType 名に SQL 識別子として使えない文字が含まれる
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// エンティティが見つからない
    ///
    /// `entity_type` には "Company", "DocType" などを指定する。
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 権限エラー
    ///
    /// 認証（Authentication）ではなく認可（Authorization）の失敗を表す。
    /// メッセージには満たされなかった条件を含める。
    #[error("権限がありません: {0}")]
    Forbidden(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_not_foundのメッセージにエンティティ種別と識別子が含まれる() {
        let err = DomainError::NotFound {
            entity_type: "Company",
            id:          "Acme".to_string(),
        };

        assert_eq!(err.to_string(), "Company が見つかりません: Acme");
    }

    #[test]
    fn test_forbiddenのメッセージに違反した条件が含まれる() {
        let err = DomainError::Forbidden("作成者のみ削除できます".to_string());

        assert_eq!(err.to_string(), "権限がありません: 作成者のみ削除できます");
    }
}
