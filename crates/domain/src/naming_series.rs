//! # 採番シリーズ
//!
//! 人が読むための連番 ID（例: `SINV-00042`）を生成する接頭辞の集合と、
//! 削除後のカウンター再計算ルールを定義する。
//!
//! ## カウンターの再計算
//!
//! 取引データ削除後、各接頭辞のカウンターは「残っている ID のうち最大のものの
//! 数値部分」に戻す。残っていなければ 0。
//!
//! 接頭辞は長い順に処理する。短い接頭辞（`INV-`）の `LIKE 'INV-%'` は長い接頭辞
//! （`INV-OLD-`）の ID にも一致してしまうため、自分を先頭に含む長い接頭辞は
//! 検索対象から除外する（[`NamingSeries::shadowing_prefixes`]）。
//!
//! 共通部分を持つが互いに前方一致しない接頭辞同士（`A-X` と `A-Y` など）は
//! 干渉しないため、この除外だけで十分である。

use itertools::Itertools;
use serde::Serialize;

/// 採番シリーズ設定
///
/// # 不変条件
///
/// - 空の接頭辞を含まない
/// - 重複を含まない
/// - 長い順に並んでいる（同じ長さは設定上の順序を保つ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingSeries {
    prefixes: Vec<String>,
}

impl NamingSeries {
    /// 改行区切りの設定値をパースする
    pub fn parse(options: &str) -> Self {
        let prefixes = options
            .lines()
            .filter(|p| !p.is_empty())
            .unique()
            .sorted_by(|a, b| b.len().cmp(&a.len()))
            .map(str::to_string)
            .collect();

        Self { prefixes }
    }

    /// 接頭辞を処理順（長い順）に返す
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// `prefix` の検索から除外すべき、より長い接頭辞を返す
    ///
    /// `prefix` で始まる、`prefix` より長い接頭辞が対象。
    pub fn shadowing_prefixes(&self, prefix: &str) -> Vec<&str> {
        self.prefixes
            .iter()
            .filter(|other| other.len() > prefix.len() && other.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    /// 既存 ID から接頭辞を取り除いた数値部分を返す
    ///
    /// 数値として解釈できない場合は 0。小数表記は切り捨てる。
    pub fn counter_from_name(prefix: &str, name: &str) -> i64 {
        let rest = name.strip_prefix(prefix).unwrap_or(name).trim();

        rest.parse::<i64>()
            .ok()
            .or_else(|| {
                rest.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| v.trunc() as i64)
            })
            .unwrap_or(0)
    }
}

/// 再計算後のシリーズカウンター
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesCounter {
    pub prefix:  String,
    pub current: i64,
}

impl SeriesCounter {
    pub fn new(prefix: impl Into<String>, current: i64) -> Self {
        Self {
            prefix: prefix.into(),
            current,
        }
    }
}
