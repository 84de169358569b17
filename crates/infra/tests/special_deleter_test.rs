//! 特別経路 Deleter（Bin / Time Log）統合テスト
//!
//! 実行方法:
//! ```bash
//! cargo test -p purgeflow-infra --test special_deleter_test
//! ```

mod common;

use common::{acme, begin, names, other_co};
use pretty_assertions::assert_eq;
use purgeflow_infra::deletion::{CompanyDeleter, PostgresBinDeleter, PostgresTimeLogDeleter};
use sqlx::PgPool;

// =============================================================================
// PostgresBinDeleter
// =============================================================================

#[sqlx::test(migrations = false, fixtures("erp_schema", "acme_transactions"))]
async fn test_bin_deleterは会社の倉庫のbinのみ削除する(pool: PgPool) {
    let sut = PostgresBinDeleter::new();

    let mut tx = begin(&pool).await;
    let result = sut.delete(&mut tx, &acme()).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(result.deleted_count, 1);
    assert_eq!(names(&pool, "tabBin").await, vec!["b2"]);
    assert_eq!(names(&pool, "tabWarehouse").await, vec!["W1", "W2"]);
}

#[sqlx::test(migrations = false, fixtures("erp_schema", "acme_transactions"))]
async fn test_bin_deleterはコミットしなければ削除が残らない(pool: PgPool) {
    let sut = PostgresBinDeleter::new();

    let mut tx = begin(&pool).await;
    sut.delete(&mut tx, &acme()).await.unwrap();
    drop(tx);

    assert_eq!(names(&pool, "tabBin").await, vec!["b1", "b2"]);
}

// =============================================================================
// PostgresTimeLogDeleter
// =============================================================================

#[sqlx::test(migrations = false, fixtures("erp_schema", "acme_transactions"))]
async fn test_time_log_deleterはいずれかの参照先が会社に属する行を削除する(
    pool: PgPool,
) {
    let sut = PostgresTimeLogDeleter::new();

    let mut tx = begin(&pool).await;
    let result = sut.delete(&mut tx, &acme()).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(result.deleted_count, 5);
    // TL-mixed は project が他社でも task が Acme なので削除される
    assert_eq!(names(&pool, "tabTime Log").await, vec!["TL-empty", "TL-other"]);
}

#[sqlx::test(migrations = false, fixtures("erp_schema", "acme_transactions"))]
async fn test_time_log_deleterは参照列がすべて空の行を削除しない(pool: PgPool) {
    let sut = PostgresTimeLogDeleter::new();

    let mut tx = begin(&pool).await;
    sut.delete(&mut tx, &other_co()).await.unwrap();
    tx.commit().await.unwrap();

    let remaining = names(&pool, "tabTime Log").await;
    assert!(remaining.contains(&"TL-empty".to_string()));
    assert!(!remaining.contains(&"TL-other".to_string()));
    assert!(!remaining.contains(&"TL-mixed".to_string()));
}

#[sqlx::test(migrations = false, fixtures("erp_schema", "acme_transactions"))]
async fn test_time_log_deleterは参照先が削除済みなら一致しない(pool: PgPool) {
    sqlx::query(r#"DELETE FROM "tabProject" WHERE name = 'PRJ-ACME'"#)
        .execute(&pool)
        .await
        .unwrap();
    let sut = PostgresTimeLogDeleter::new();

    let mut tx = begin(&pool).await;
    sut.delete(&mut tx, &acme()).await.unwrap();
    tx.commit().await.unwrap();

    assert!(
        names(&pool, "tabTime Log")
            .await
            .contains(&"TL-project".to_string())
    );
}
