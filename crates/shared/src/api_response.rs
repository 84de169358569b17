//! # API レスポンスエンベロープ
//!
//! 成功レスポンスの統一形式 `{ "data": T }` を提供する。

use serde::{Deserialize, Serialize};

/// 成功レスポンスの統一型
///
/// エンドポイントは `{ "data": T }` 形式でレスポンスを返す。
/// 呼び出し側のクライアントは同じ型で Deserialize できる。
///
/// ## 使用例
///
/// ```
/// use purgeflow_shared::ApiResponse;
///
/// let response = ApiResponse::new(vec!["Sales Invoice", "Stock Entry"]);
/// assert_eq!(response.data.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
