//! # ユーザーと呼び出し元
//!
//! 削除操作を要求するユーザー（呼び出し元）を表現する。
//!
//! ## 設計方針
//!
//! - **明示的なコンテキスト**: 呼び出し元はセッションなどの暗黙の状態から
//!   取得せず、[`Caller`] として各操作に引数で渡す
//! - **PII 保護**: ユーザー ID はメールアドレスであることが多いため、
//!   Debug 出力をマスクし Display を提供しない

use serde::{Deserialize, Serialize};

/// 会社の取引データ削除に必要なロール
pub const SYSTEM_MANAGER_ROLE: &str = "System Manager";

define_validated_string! {
    /// ユーザー ID（値オブジェクト）
    ///
    /// レコードの `owner` 列に記録される作成者の識別子。
    /// 通常はログインメールアドレス。
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 140 文字
    pub struct UserId {
        label: "ユーザー ID",
        max_length: 140,
        pii: true,
    }
}

define_validated_string! {
    /// ロール名（値オブジェクト）
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 140 文字
    pub struct RoleName {
        label: "ロール名",
        max_length: 140,
    }
}

/// 操作の呼び出し元
///
/// 認証済みユーザーの ID と、そのユーザーが保持するロールの一覧。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    user_id: UserId,
    roles:   Vec<RoleName>,
}

impl Caller {
    /// 呼び出し元を作成する
    pub fn new(user_id: UserId, roles: Vec<RoleName>) -> Self {
        Self { user_id, roles }
    }

    /// ユーザー ID を取得する
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// 保持しているロールの一覧を取得する
    pub fn roles(&self) -> &[RoleName] {
        &self.roles
    }

    /// 指定したロールを保持しているかどうか
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller_with_roles(roles: &[&str]) -> Caller {
        Caller::new(
            UserId::new("owner@acme.example").unwrap(),
            roles.iter().map(|r| RoleName::new(*r).unwrap()).collect(),
        )
    }

    #[test]
    fn test_ユーザーidは空文字列を拒否する() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn test_ユーザーidのdebug出力はマスクされる() {
        let user_id = UserId::new("owner@acme.example").unwrap();

        let debug = format!("{user_id:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("owner@acme.example"));
    }

    #[test]
    fn test_has_roleは保持しているロールでtrueを返す() {
        let caller = caller_with_roles(&["Accounts User", SYSTEM_MANAGER_ROLE]);

        assert!(caller.has_role(SYSTEM_MANAGER_ROLE));
    }

    #[test]
    fn test_has_roleは大文字小文字を区別する() {
        let caller = caller_with_roles(&["system manager"]);

        assert!(!caller.has_role(SYSTEM_MANAGER_ROLE));
    }

    #[test]
    fn test_ロールなしの呼び出し元はどのロールも持たない() {
        let caller = caller_with_roles(&[]);

        assert!(caller.roles().is_empty());
        assert!(!caller.has_role(SYSTEM_MANAGER_ROLE));
    }
}
