//! # 取引データ削除ポリシー
//!
//! 会社にリンクしていてもカスケード削除してはならない DocType を定義する。
//! 勘定科目表や倉庫などのマスタ構造は会社をまたいで再利用される前提のため、
//! 取引データの削除対象に含めない。

use crate::doctype::DocTypeName;

/// カスケード削除の対象外とする DocType
pub const EXCLUDED_DOCTYPES: [&str; 5] = [
    "Account",
    "Cost Center",
    "Warehouse",
    "Budget Detail",
    "Party Account",
];

/// カスケード削除の対象外かどうか
pub fn is_excluded(doctype: &DocTypeName) -> bool {
    EXCLUDED_DOCTYPES.contains(&doctype.as_str())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Account")]
    #[case("Cost Center")]
    #[case("Warehouse")]
    #[case("Budget Detail")]
    #[case("Party Account")]
    fn test_マスタ構造のdoctypeは対象外(#[case] name: &str) {
        assert!(is_excluded(&DocTypeName::new(name).unwrap()));
    }

    #[rstest]
    #[case("Sales Invoice")]
    #[case("Bin")]
    #[case("account")]
    fn test_それ以外のdoctypeは対象(#[case] name: &str) {
        assert!(!is_excluded(&DocTypeName::new(name).unwrap()));
    }
}
