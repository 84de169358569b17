//! # テスト用モックリポジトリ
//!
//! ユースケーステストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! purgeflow-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! [`MockCompanyStore`] は DocType ごとの行をメモリ上に保持し、削除・採番更新を
//! 操作ログに記録する。操作ログで実行順序（子テーブル → 本体など）を検証できる。

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use purgeflow_domain::{
    company::{Company, CompanyName},
    doctype::{DocTypeMeta, DocTypeName, FieldName},
    user::{RoleName, UserId},
};

use crate::{
    db::{TransactionManager, TxContext},
    deletion::{CompanyDeleter, DeletionResult, DocTypeRecordStore},
    error::InfraError,
    notification_cache::NotificationCache,
    repository::{CompanyRepository, NamingSeriesRepository, SchemaRegistry, UserRoleRepository},
};

// ===== MockRow / MockCompanyStore =====

/// インメモリの 1 行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRow {
    pub name:   String,
    pub values: HashMap<String, String>,
}

impl MockRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:   name.into(),
            values: HashMap::new(),
        }
    }

    /// 列の値を設定する
    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.values.insert(column.to_string(), value.into());
        self
    }

    /// 列の値を取得する。未設定の場合は空文字列
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Default)]
struct StoreState {
    tables:          HashMap<String, Vec<MockRow>>,
    series:          BTreeMap<String, i64>,
    operations:      Vec<String>,
    failing_doctype: Option<String>,
}

/// インメモリの会社データストア
///
/// [`DocTypeRecordStore`] と [`NamingSeriesRepository`] を実装する。
/// Bin / Time Log の特別経路は [`MockCompanyStore::bin_deleter`] /
/// [`MockCompanyStore::time_log_deleter`] で取得する。
#[derive(Clone, Default)]
pub struct MockCompanyStore {
    state: Arc<Mutex<StoreState>>,
}

impl MockCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 行を追加する
    pub fn insert(&self, doctype: &str, row: MockRow) {
        self.state
            .lock()
            .unwrap()
            .tables
            .entry(doctype.to_string())
            .or_default()
            .push(row);
    }

    /// 残っている行の `name` を追加順に返す
    pub fn names(&self, doctype: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(doctype)
            .map(|rows| rows.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }

    /// 採番シリーズのカウンターを設定する
    pub fn set_series(&self, prefix: &str, current: i64) {
        self.state
            .lock()
            .unwrap()
            .series
            .insert(prefix.to_string(), current);
    }

    /// 採番シリーズのカウンターを取得する
    pub fn series(&self, prefix: &str) -> Option<i64> {
        self.state.lock().unwrap().series.get(prefix).copied()
    }

    /// 実行された操作のログを返す
    pub fn operations(&self) -> Vec<String> {
        self.state.lock().unwrap().operations.clone()
    }

    /// 指定した DocType の行削除でエラーを返すようにする
    pub fn fail_on(&self, doctype: &str) {
        self.state.lock().unwrap().failing_doctype = Some(doctype.to_string());
    }

    /// Bin の特別経路 Deleter を返す
    pub fn bin_deleter(&self) -> MockBinDeleter {
        MockBinDeleter {
            store: self.clone(),
        }
    }

    /// Time Log の特別経路 Deleter を返す
    pub fn time_log_deleter(&self) -> MockTimeLogDeleter {
        MockTimeLogDeleter {
            store: self.clone(),
        }
    }

    /// `doctype` の行のうち `column` が `company` の行の `name` を返す
    fn names_where(&self, doctype: &str, column: &str, company: &str) -> HashSet<String> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(doctype)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.get(column) == company)
                    .map(|r| r.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 条件に一致する行を削除し、削除件数を返す
    fn remove_where(
        &self,
        doctype: &str,
        operation: String,
        predicate: impl Fn(&MockRow) -> bool,
    ) -> Result<u64, InfraError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_doctype.as_deref() == Some(doctype) {
            return Err(InfraError::unexpected(format!("{doctype}: テスト用エラー")));
        }
        state.operations.push(operation);

        let Some(rows) = state.tables.get_mut(doctype) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !predicate(r));
        Ok((before - rows.len()) as u64)
    }
}

#[async_trait]
impl DocTypeRecordStore for MockCompanyStore {
    async fn delete_child_rows(
        &self,
        _tx: &mut TxContext,
        child: &DocTypeName,
        parent: &DocTypeName,
        link_field: &FieldName,
        company: &CompanyName,
    ) -> Result<u64, InfraError> {
        let parents = self.names_where(parent.as_str(), link_field.as_str(), company.as_str());
        self.remove_where(
            child.as_str(),
            format!("delete_child:{child}<-{parent}"),
            |row| parents.contains(row.get("parent")),
        )
    }

    async fn delete_linked_rows(
        &self,
        _tx: &mut TxContext,
        doctype: &DocTypeName,
        link_field: &FieldName,
        company: &CompanyName,
    ) -> Result<u64, InfraError> {
        self.remove_where(doctype.as_str(), format!("delete:{doctype}"), |row| {
            row.get(link_field.as_str()) == company.as_str()
        })
    }
}

#[async_trait]
impl NamingSeriesRepository for MockCompanyStore {
    async fn max_name_with_prefix(
        &self,
        _tx: &mut TxContext,
        doctype: &DocTypeName,
        prefix: &str,
        shadowing: &[&str],
    ) -> Result<Option<String>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .tables
            .get(doctype.as_str())
            .and_then(|rows| {
                rows.iter()
                    .map(|r| r.name.as_str())
                    .filter(|name| name.starts_with(prefix))
                    .filter(|name| !shadowing.iter().any(|longer| name.starts_with(longer)))
                    .max()
                    .map(str::to_string)
            }))
    }

    async fn upsert_current(
        &self,
        _tx: &mut TxContext,
        prefix: &str,
        current: i64,
    ) -> Result<(), InfraError> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(format!("series:{prefix}={current}"));
        state.series.insert(prefix.to_string(), current);
        Ok(())
    }
}

// ===== MockBinDeleter / MockTimeLogDeleter =====

/// インメモリの Bin Deleter（倉庫経由で会社に属する行を削除）
pub struct MockBinDeleter {
    store: MockCompanyStore,
}

#[async_trait]
impl CompanyDeleter for MockBinDeleter {
    fn name(&self) -> &'static str {
        "postgres:bin"
    }

    async fn delete(
        &self,
        _tx: &mut TxContext,
        company: &CompanyName,
    ) -> Result<DeletionResult, InfraError> {
        let warehouses = self
            .store
            .names_where("Warehouse", "company", company.as_str());
        let deleted_count = self
            .store
            .remove_where("Bin", "special:Bin".to_string(), |row| {
                warehouses.contains(row.get("warehouse"))
            })?;
        Ok(DeletionResult { deleted_count })
    }
}

/// Time Log の参照列と参照先 DocType
const TIME_LOG_REFERENCES: [(&str, &str); 4] = [
    ("project", "Project"),
    ("task", "Task"),
    ("production_order", "Production Order"),
    ("sales_invoice", "Sales Invoice"),
];

/// インメモリの Time Log Deleter（いずれかの参照先が会社に属する行を削除）
pub struct MockTimeLogDeleter {
    store: MockCompanyStore,
}

#[async_trait]
impl CompanyDeleter for MockTimeLogDeleter {
    fn name(&self) -> &'static str {
        "postgres:time_log"
    }

    async fn delete(
        &self,
        _tx: &mut TxContext,
        company: &CompanyName,
    ) -> Result<DeletionResult, InfraError> {
        let owned: Vec<(&str, HashSet<String>)> = TIME_LOG_REFERENCES
            .iter()
            .map(|(column, doctype)| {
                (
                    *column,
                    self.store.names_where(doctype, "company", company.as_str()),
                )
            })
            .collect();

        let deleted_count =
            self.store
                .remove_where("Time Log", "special:Time Log".to_string(), |row| {
                    owned.iter().any(|(column, names)| {
                        let value = row.get(column);
                        !value.is_empty() && names.contains(value)
                    })
                })?;
        Ok(DeletionResult { deleted_count })
    }
}

// ===== MockSchemaRegistry =====

#[derive(Clone, Default)]
pub struct MockSchemaRegistry {
    metas:       Arc<Mutex<Vec<DocTypeMeta>>>,
    extra_links: Arc<Mutex<Vec<DocTypeName>>>,
}

impl MockSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_meta(&self, meta: DocTypeMeta) {
        self.metas.lock().unwrap().push(meta);
    }

    /// 記述子にリンクフィールドがなくても、リンク元として列挙される DocType を追加する
    ///
    /// フィールド名が空のリンク行など、列挙と記述子が食い違うメタデータを再現する。
    pub fn add_linking_doctype(&self, doctype: DocTypeName) {
        self.extra_links.lock().unwrap().push(doctype);
    }
}

#[async_trait]
impl SchemaRegistry for MockSchemaRegistry {
    async fn find_doctypes_linking_to(
        &self,
        _tx: &mut TxContext,
        target: &DocTypeName,
    ) -> Result<Vec<DocTypeName>, InfraError> {
        let mut names: Vec<DocTypeName> = self
            .metas
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.link_field_to(target).is_some())
            .map(|m| m.name().clone())
            .collect();
        names.extend(self.extra_links.lock().unwrap().iter().cloned());
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn describe(
        &self,
        _tx: &mut TxContext,
        doctype: &DocTypeName,
    ) -> Result<Option<DocTypeMeta>, InfraError> {
        Ok(self
            .metas
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.name() == doctype)
            .cloned())
    }
}

// ===== MockCompanyRepository =====

#[derive(Clone, Default)]
pub struct MockCompanyRepository {
    companies: Arc<Mutex<Vec<Company>>>,
}

impl MockCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_company(&self, company: Company) {
        self.companies.lock().unwrap().push(company);
    }
}

#[async_trait]
impl CompanyRepository for MockCompanyRepository {
    async fn find_by_name(&self, name: &CompanyName) -> Result<Option<Company>, InfraError> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name() == name)
            .cloned())
    }
}

// ===== MockUserRoleRepository =====

#[derive(Clone, Default)]
pub struct MockUserRoleRepository {
    roles: Arc<Mutex<Vec<(UserId, RoleName)>>>,
}

impl MockUserRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_role(&self, user_id: UserId, role: RoleName) {
        self.roles.lock().unwrap().push((user_id, role));
    }
}

#[async_trait]
impl UserRoleRepository for MockUserRoleRepository {
    async fn find_roles(&self, user_id: &UserId) -> Result<Vec<RoleName>, InfraError> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, r)| r.clone())
            .collect())
    }
}

// ===== MockNotificationCache =====

#[derive(Clone, Default)]
pub struct MockNotificationCache {
    calls:       Arc<AtomicUsize>,
    should_fail: bool,
}

impl MockNotificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常にエラーを返すキャッシュを作成する
    pub fn failing() -> Self {
        Self {
            calls:       Arc::new(AtomicUsize::new(0)),
            should_fail: true,
        }
    }

    /// `clear_notifications` の呼び出し回数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationCache for MockNotificationCache {
    async fn clear_notifications(&self) -> Result<u64, InfraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(InfraError::unexpected("通知件数キャッシュ: テスト用エラー"));
        }
        Ok(0)
    }
}

// ===== MockTransactionManager =====

/// コミット回数を記録するモック TransactionManager
#[derive(Clone, Default)]
pub struct MockTransactionManager {
    begins:  Arc<AtomicUsize>,
    commits: Arc<AtomicUsize>,
}

impl MockTransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 開始されたトランザクション数
    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    /// コミットされたトランザクション数
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionManager for MockTransactionManager {
    async fn begin(&self) -> Result<TxContext, InfraError> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(TxContext::mock_with_commit_counter(self.commits.clone()))
    }
}
