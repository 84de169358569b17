//! # 動的 SQL の組み立て
//!
//! 削除対象のテーブル名・列名は実行時にメタデータから決まるため、
//! `sqlx::query!` のコンパイル時検証は使えない。識別子は検証済みの値オブジェクトを
//! 引用符付きで埋め込み、値は必ずバインドパラメータで渡す。

use purgeflow_domain::doctype::{DocTypeName, FieldName};

/// 物理テーブル名の接頭辞
pub const TABLE_PREFIX: &str = "tab";

/// LIKE パターンのエスケープ文字
pub const LIKE_ESCAPE: char = '\\';

/// 識別子をダブルクォートで囲む
///
/// 内部のダブルクォートは二重化する。
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// DocType の物理テーブル名（引用符付き）を返す
///
/// ```
/// use purgeflow_domain::doctype::DocTypeName;
/// use purgeflow_infra::sql::table_ident;
///
/// let doctype = DocTypeName::new("Sales Invoice").unwrap();
/// assert_eq!(table_ident(&doctype), "\"tabSales Invoice\"");
/// ```
pub fn table_ident(doctype: &DocTypeName) -> String {
    quote_ident(&format!("{TABLE_PREFIX}{doctype}"))
}

/// 列名（引用符付き）を返す
pub fn column_ident(field: &FieldName) -> String {
    quote_ident(field.as_str())
}

/// LIKE のメタ文字（`%` `_` とエスケープ文字自身）をエスケープする
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// 前方一致の LIKE パターンを返す
pub fn like_prefix(prefix: &str) -> String {
    format!("{}%", escape_like(prefix))
}
