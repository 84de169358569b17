//! # 会社
//!
//! マルチテナント ERP におけるテナント単位である会社（Company）のモデル。
//!
//! 取引データはすべて、リンクフィールド経由でいずれかの会社に属する。
//! このクレートは会社レコード自体を作成・変更しない。名前と作成者（owner）を
//! 読み取り、取引データ削除の認可判定に使うだけである。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use purgeflow_domain::{
//!     company::{Company, CompanyName},
//!     user::{Caller, RoleName, SYSTEM_MANAGER_ROLE, UserId},
//! };
//!
//! let owner = UserId::new("owner@acme.example")?;
//! let company = Company::from_db(CompanyName::new("Acme")?, owner.clone());
//!
//! let caller = Caller::new(owner, vec![RoleName::new(SYSTEM_MANAGER_ROLE)?]);
//! assert!(company.authorize_transaction_deletion(&caller).is_ok());
//! # Ok(())
//! # }
//! ```

use crate::{
    DomainError,
    user::{Caller, SYSTEM_MANAGER_ROLE, UserId},
};

define_validated_string! {
    /// 会社名（値オブジェクト）
    ///
    /// 会社レコードの一意な名前。リンクフィールドにはこの値が格納される。
    ///
    /// # バリデーション
    ///
    /// - 空文字列・空白のみではない
    /// - 前後の空白は保持する（リンクフィールドの値と完全一致で照合するため）
    /// - 最大 140 文字（`name` 列の長さ）
    pub struct CompanyName {
        label: "会社名",
        max_length: 140,
        trim: false,
    }
}

/// 会社エンティティ
///
/// # 不変条件
///
/// - `name` はシステム内で一意
#[derive(Debug, Clone)]
pub struct Company {
    name:  CompanyName,
    owner: UserId,
}

impl Company {
    /// データベースから会社を復元する
    pub fn from_db(name: CompanyName, owner: UserId) -> Self {
        Self { name, owner }
    }

    /// 会社名を取得する
    pub fn name(&self) -> &CompanyName {
        &self.name
    }

    /// 作成者を取得する
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// 取引データの削除を許可してよいか判定する
    ///
    /// 呼び出し元が以下の両方を満たす場合のみ `Ok(())` を返す:
    ///
    /// 1. [`SYSTEM_MANAGER_ROLE`] を保持している
    /// 2. 会社の作成者本人である
    ///
    /// どちらかを満たさない場合は、満たさなかった条件をメッセージに含む
    /// [`DomainError::Forbidden`] を返す。
    pub fn authorize_transaction_deletion(&self, caller: &Caller) -> Result<(), DomainError> {
        if !caller.has_role(SYSTEM_MANAGER_ROLE) {
            return Err(DomainError::Forbidden(format!(
                "取引データの削除には {SYSTEM_MANAGER_ROLE} ロールが必要です"
            )));
        }

        if caller.user_id() != &self.owner {
            return Err(DomainError::Forbidden(
                "取引データを削除できるのは会社の作成者のみです".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::user::RoleName;

    fn acme() -> Company {
        Company::from_db(
            CompanyName::new("Acme").unwrap(),
            UserId::new("owner@acme.example").unwrap(),
        )
    }

    fn caller(user: &str, roles: &[&str]) -> Caller {
        Caller::new(
            UserId::new(user).unwrap(),
            roles.iter().map(|r| RoleName::new(*r).unwrap()).collect(),
        )
    }

    // CompanyName のテスト

    #[test]
    fn test_会社名は前後の空白を保持する() {
        let name = CompanyName::new(" Acme ").unwrap();
        assert_eq!(name.as_str(), " Acme ");
        assert_ne!(name, CompanyName::new("Acme").unwrap());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_会社名は空文字列と空白のみを拒否する(#[case] value: &str) {
        assert!(CompanyName::new(value).is_err());
    }

    #[test]
    fn test_会社名は140文字を超えると拒否する() {
        assert!(CompanyName::new("a".repeat(141)).is_err());
        assert!(CompanyName::new("a".repeat(140)).is_ok());
    }

    // 認可判定のテスト

    #[test]
    fn test_作成者かつsystem_managerなら削除を許可する() {
        let result =
            acme().authorize_transaction_deletion(&caller("owner@acme.example", &[SYSTEM_MANAGER_ROLE]));

        assert!(result.is_ok());
    }

    #[test]
    fn test_system_managerでも作成者以外は拒否する() {
        let result = acme()
            .authorize_transaction_deletion(&caller("admin@acme.example", &[SYSTEM_MANAGER_ROLE]));

        let err = result.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(ref msg) if msg.contains("作成者")));
    }

    #[rstest]
    #[case::ロールなし(&[])]
    #[case::別ロールのみ(&["Accounts Manager"])]
    fn test_作成者でもsystem_managerでなければ拒否する(#[case] roles: &[&str]) {
        let result = acme().authorize_transaction_deletion(&caller("owner@acme.example", roles));

        let err = result.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(ref msg) if msg.contains(SYSTEM_MANAGER_ROLE)));
    }
}
