//! # ログ出力の初期化
//!
//! Core Service のログ出力（`tracing` subscriber）を組み立てる。
//!
//! - `LOG_FORMAT`: `json`（本番で集約する場合）または `pretty`（手元での確認）
//! - `RUST_LOG`: ログレベル。未設定なら [`DEFAULT_LOG_FILTER`]
//!
//! 削除処理のエラーは、発生時のスパン（どの会社・どの DocType を処理中か）を
//! `SpanTrace` として持ち回る。そのため [`init_tracing`] は
//! `tracing_error::ErrorLayer` を必ず登録する。

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 JSON
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する
    ///
    /// 前後の空白と大文字小文字は区別しない。解釈できない値は `None`。
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    ///
    /// 解釈できない値なら Pretty で起動する。subscriber の初期化前なので警告は stderr に出す。
    pub fn from_env() -> Self {
        let Ok(value) = std::env::var("LOG_FORMAT") else {
            return Self::default();
        };
        Self::parse(&value).unwrap_or_else(|| {
            eprintln!("WARNING: LOG_FORMAT={value:?} は解釈できないため pretty で出力します");
            Self::default()
        })
    }
}

/// `RUST_LOG` 未設定時のフィルタ
///
/// 自前のクレート（`purgeflow_*`）は削除の進捗を追えるよう debug まで出す。
pub const DEFAULT_LOG_FILTER: &str = "info,purgeflow=debug";

/// ログ出力の設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }

    /// プロセス全体を包むスパン。JSON 出力ではすべての行に `service` が付く
    #[cfg(feature = "observability")]
    pub fn root_span(&self) -> tracing::Span {
        tracing::info_span!("app", service = %self.service_name)
    }
}

/// subscriber をグローバルに登録する
///
/// プロセスで 1 回だけ呼ぶ。JSON 出力ではイベントのフィールド
/// （`company`, `doctype`, `deleted_count` など）をトップレベルに展開する。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();
}

/// パスが会社単位のエンドポイントを指していれば、その会社名を返す
///
/// `/internal/companies/{company_name}/...` の形だけを対象にする。
/// 会社名はパーセントエンコードされたまま返す。
pub fn company_from_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/internal/companies/")?;
    let (company, _) = rest.split_once('/')?;
    (!company.is_empty()).then_some(company)
}

/// HTTP リクエストごとのスパンを作成する
///
/// `TraceLayer::make_span_with` に渡す。会社単位のエンドポイントでは
/// `company` を記録し、削除処理のログとリクエストを突き合わせられるようにする。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let company = company_from_path(request.uri().path()).unwrap_or_default();
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        company,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("json", Some(LogFormat::Json))]
    #[case(" JSON\n", Some(LogFormat::Json))]
    #[case("Pretty", Some(LogFormat::Pretty))]
    #[case("", None)]
    #[case("yaml", None)]
    fn test_log_formatの解釈(#[case] value: &str, #[case] expected: Option<LogFormat>) {
        assert_eq!(LogFormat::parse(value), expected);
    }

    #[rstest]
    #[case("/internal/companies/Acme/transactions/delete", Some("Acme"))]
    #[case("/internal/companies/Acme%20Corp/transactions/delete", Some("Acme%20Corp"))]
    #[case("/internal/companies//transactions/delete", None)]
    #[case("/internal/companies/Acme", None)]
    #[case("/health/ready", None)]
    fn test_パスから会社名を取り出す(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(company_from_path(path), expected);
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_削除リクエストのスパンを作成できる() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/internal/companies/Acme/transactions/delete")
            .body(())
            .unwrap();

        let span = make_request_span(&request);

        // subscriber 未登録のため無効スパンになる
        assert!(span.is_disabled() || span.metadata().is_some());
    }
}
