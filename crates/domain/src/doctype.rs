//! # DocType（レコード種別）メタデータ
//!
//! スキーマレジストリから取得したレコード種別（テーブル）の記述子を表現する。
//!
//! ## 用語
//!
//! | 型 | 用語 | 説明 |
//! |---|------|------|
//! | [`DocTypeName`] | DocType 名 | レコード種別名。物理テーブル名は `tab{DocType 名}` |
//! | [`DocTypeKind`] | DocType 種別 | シングル / 子テーブル / 通常 |
//! | [`DocField`] | フィールド定義 | フィールド名・型・オプション |
//! | [`DocTypeMeta`] | 記述子 | 上記をまとめたもの |
//!
//! ## 設計方針
//!
//! - **実行時解決**: 外部キーグラフは静的に持たず、削除のたびにメタデータから解決する
//! - **タグ付き種別**: `issingle` / `istable` の 2 フラグを [`DocTypeKind`] に正規化する
//! - **識別子の検証**: DocType 名・フィールド名は SQL 文字列に埋め込まれるため、
//!   生成時に文字種と長さを検証する

use std::str::FromStr;

use strum::EnumString;

use crate::{DomainError, naming_series::NamingSeries};

/// 会社 DocType の名前
pub const COMPANY_DOCTYPE: &str = "Company";

/// 採番シリーズを保持するフィールドの名前
pub const NAMING_SERIES_FIELD: &str = "naming_series";

define_identifier! {
    /// DocType 名（値オブジェクト）
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `tab` 接頭辞を付けても PostgreSQL の識別子長（63 バイト）に収まる
    /// - ASCII 英数字・空白・`_`・`-` のみ
    pub struct DocTypeName {
        label: "DocType 名",
        max_bytes: 60,
        allowed: |c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'),
    }
}

define_identifier! {
    /// フィールド名（値オブジェクト）
    ///
    /// 物理テーブルの列名と一致する。
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 63 バイト以内
    /// - ASCII 英小文字・数字・`_` のみ
    pub struct FieldName {
        label: "フィールド名",
        max_bytes: 63,
        allowed: |c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_',
    }
}

impl DocTypeName {
    /// 会社 DocType の名前を返す
    pub fn company() -> Self {
        Self(COMPANY_DOCTYPE.to_string())
    }
}

/// フィールド型
///
/// カスケード削除で意味を持つ型のみ列挙し、それ以外は [`FieldType::Other`] に
/// 元の文字列のまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum FieldType {
    /// 単一レコードへの参照。`options` に参照先 DocType 名を持つ
    Link,
    /// 子テーブル。`options` に子 DocType 名を持つ
    Table,
    /// 選択肢。`options` は改行区切りの候補
    Select,
    /// 文字列
    Data,
    /// 上記以外
    #[strum(default)]
    Other(String),
}

impl FieldType {
    /// メタデータ上の表記を返す
    pub fn as_str(&self) -> &str {
        match self {
            Self::Link => "Link",
            Self::Table => "Table",
            Self::Select => "Select",
            Self::Data => "Data",
            Self::Other(value) => value,
        }
    }

    /// メタデータ上の表記からフィールド型を解決する
    pub fn parse(value: &str) -> Self {
        // Other がフォールバックになるため失敗しない
        Self::from_str(value).unwrap_or_else(|_| Self::Other(value.to_string()))
    }
}

/// フィールド定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocField {
    fieldname: FieldName,
    fieldtype: FieldType,
    options:   Option<String>,
}

impl DocField {
    pub fn new(fieldname: FieldName, fieldtype: FieldType, options: Option<String>) -> Self {
        Self {
            fieldname,
            fieldtype,
            options,
        }
    }

    pub fn fieldname(&self) -> &FieldName {
        &self.fieldname
    }

    pub fn fieldtype(&self) -> &FieldType {
        &self.fieldtype
    }

    pub fn options(&self) -> Option<&str> {
        self.options.as_deref()
    }

    /// 指定した DocType へのリンクフィールドかどうか
    pub fn links_to(&self, target: &DocTypeName) -> bool {
        self.fieldtype == FieldType::Link && self.options() == Some(target.as_str())
    }

    /// 子テーブルフィールドの参照先 DocType 名を返す
    ///
    /// 子テーブルフィールドでない場合は `Ok(None)`。
    /// `options` が DocType 名として不正な場合はエラー。
    pub fn child_doctype(&self) -> Result<Option<DocTypeName>, DomainError> {
        if self.fieldtype != FieldType::Table {
            return Ok(None);
        }
        let options = self.options().unwrap_or_default();
        DocTypeName::new(options).map(Some)
    }
}

/// DocType 種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTypeKind {
    /// シングル。設定値のみを持ち、行を持たない
    Single,
    /// 子テーブル。行は `parent` 列で親レコードに所有される
    ChildTable,
    /// 通常の DocType
    Standard,
}

impl DocTypeKind {
    /// `issingle` / `istable` フラグから種別を決定する
    ///
    /// 両方立っている場合はシングルを優先する（行が存在しないため）。
    pub fn from_flags(is_single: bool, is_table: bool) -> Self {
        match (is_single, is_table) {
            (true, _) => Self::Single,
            (false, true) => Self::ChildTable,
            (false, false) => Self::Standard,
        }
    }
}

/// DocType 記述子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTypeMeta {
    name:   DocTypeName,
    kind:   DocTypeKind,
    fields: Vec<DocField>,
}

impl DocTypeMeta {
    /// 記述子を作成する
    ///
    /// `fields` はメタデータ上の宣言順（`idx` 昇順）で渡すこと。
    pub fn new(name: DocTypeName, kind: DocTypeKind, fields: Vec<DocField>) -> Self {
        Self { name, kind, fields }
    }

    pub fn name(&self) -> &DocTypeName {
        &self.name
    }

    pub fn kind(&self) -> DocTypeKind {
        self.kind
    }

    pub fn fields(&self) -> &[DocField] {
        &self.fields
    }

    /// 指定した DocType への最初のリンクフィールドを返す
    ///
    /// 宣言順で最初に一致したものを採用する。
    pub fn link_field_to(&self, target: &DocTypeName) -> Option<&DocField> {
        self.fields.iter().find(|f| f.links_to(target))
    }

    /// 子テーブルフィールドを宣言順に返す
    pub fn table_fields(&self) -> impl Iterator<Item = &DocField> {
        self.fields
            .iter()
            .filter(|f| f.fieldtype == FieldType::Table)
    }

    /// 採番シリーズの設定を返す
    ///
    /// `naming_series` フィールドがない場合は `None`。
    pub fn naming_series(&self) -> Option<NamingSeries> {
        self.fields
            .iter()
            .find(|f| f.fieldname.as_str() == NAMING_SERIES_FIELD)
            .map(|f| NamingSeries::parse(f.options().unwrap_or_default()))
    }
}
