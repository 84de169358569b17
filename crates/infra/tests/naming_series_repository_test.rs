//! PostgresNamingSeriesRepository 統合テスト
//!
//! 実行方法:
//! ```bash
//! cargo test -p purgeflow-infra --test naming_series_repository_test
//! ```

mod common;

use common::{begin, doctype, series_current};
use pretty_assertions::assert_eq;
use purgeflow_infra::repository::{NamingSeriesRepository, PostgresNamingSeriesRepository};
use sqlx::PgPool;

#[sqlx::test(migrations = false, fixtures("erp_schema", "acme_transactions"))]
async fn test_短い接頭辞の最大値は長い接頭辞のidを除外する(pool: PgPool) {
    let sut = PostgresNamingSeriesRepository::new();
    let invoice = doctype("Sales Invoice");

    let mut tx = begin(&pool).await;
    let shorter = sut
        .max_name_with_prefix(&mut tx, &invoice, "INV-", &["INV-OLD-"])
        .await
        .unwrap();
    let longer = sut
        .max_name_with_prefix(&mut tx, &invoice, "INV-OLD-", &[])
        .await
        .unwrap();

    assert_eq!(shorter.as_deref(), Some("INV-0007"));
    assert_eq!(longer.as_deref(), Some("INV-OLD-0009"));
}

#[sqlx::test(migrations = false, fixtures("erp_schema", "acme_transactions"))]
async fn test_一致する行がなければnoneを返す(pool: PgPool) {
    let sut = PostgresNamingSeriesRepository::new();

    let mut tx = begin(&pool).await;
    let max = sut
        .max_name_with_prefix(&mut tx, &doctype("Sales Invoice"), "SO-", &[])
        .await
        .unwrap();

    assert_eq!(max, None);
}

#[sqlx::test(migrations = false, fixtures("erp_schema"))]
async fn test_likeのメタ文字は文字どおりに一致する(pool: PgPool) {
    sqlx::query(
        r#"INSERT INTO "tabSales Invoice" (name) VALUES ('SO_1-0003'), ('SOX1-0009')"#,
    )
    .execute(&pool)
    .await
    .unwrap();
    let sut = PostgresNamingSeriesRepository::new();

    let mut tx = begin(&pool).await;
    let max = sut
        .max_name_with_prefix(&mut tx, &doctype("Sales Invoice"), "SO_1-", &[])
        .await
        .unwrap();

    assert_eq!(max.as_deref(), Some("SO_1-0003"));
}

#[sqlx::test(migrations = false, fixtures("erp_schema", "acme_transactions"))]
async fn test_upsert_currentは既存行を更新し存在しない行を作成する(pool: PgPool) {
    let sut = PostgresNamingSeriesRepository::new();

    let mut tx = begin(&pool).await;
    sut.upsert_current(&mut tx, "INV-", 5).await.unwrap();
    sut.upsert_current(&mut tx, "SO-", 0).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(series_current(&pool, "INV-").await, Some(5));
    assert_eq!(series_current(&pool, "INV-OLD-").await, Some(9));
    assert_eq!(series_current(&pool, "SO-").await, Some(0));
}
