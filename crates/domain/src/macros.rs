/// バリデーション付き String Newtype の共通メソッドを生成する内部マクロ
///
/// `define_validated_string!` の PII / 非 PII 両アームで共有される
/// `new()`, `as_str()`, `into_string()` を一括生成する。
///
/// `$trim` が `false` のときは値をそのまま保持する。空白のみの値はどちらでも拒否する。
macro_rules! _validated_string_common {
    ($Name:ident, $label:expr, $max_length:expr) => {
        _validated_string_common!($Name, $label, $max_length, true);
    };
    ($Name:ident, $label:expr, $max_length:expr, $trim:literal) => {
        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value: String = value.into();
                let value = if $trim {
                    value.trim().to_string()
                } else {
                    value
                };

                if value.trim().is_empty() {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は必須です",
                        $label
                    )));
                }

                if value.chars().count() > $max_length {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は {} 文字以内である必要があります",
                        $label, $max_length
                    )));
                }

                Ok(Self(value))
            }

            /// 文字列参照を取得する
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// 所有権を持つ文字列に変換する
            pub fn into_string(self) -> String {
                self.0
            }
        }
    };
}

/// バリデーション付き String Newtype を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`String` をラップ）
/// - `new()`: trim + 空チェック + 最大長チェック（`trim: false` でトリミングしない）
/// - `as_str()`: 文字列参照
/// - `into_string()`: 所有権を持つ文字列に変換
///
/// # PII モード
///
/// `pii: true` を指定すると PII 保護モードになる:
/// - `Debug` 出力を `[REDACTED]` にマスクする
/// - `Display` impl を生成しない（平文出力を防止）
///
/// `pii` を指定しない場合（デフォルト）:
/// - `derive(Debug)` で通常の Debug 出力
/// - `Display` impl を生成（平文出力）
///
/// # 引数
///
/// - `$label`: エラーメッセージに使うラベル（例: `"会社名"`）
/// - `$max_length`: 最大文字数（`chars().count()` でカウント）
/// - `pii`: （任意）`true` を指定すると PII 保護モード
/// - `trim`: （任意、非 PII のみ）`false` を指定すると前後の空白を保持する。
///   保存済みの値と完全一致で照合する名前に使う
///
/// # 使用例
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use purgeflow_domain::user::UserId;
///
/// let user_id = UserId::new("owner@acme.example")?;
/// assert_eq!(user_id.as_str(), "owner@acme.example");
/// // Debug 出力はマスクされる（PII 保護）
/// assert!(format!("{:?}", user_id).contains("[REDACTED]"));
/// # Ok(())
/// # }
/// ```
macro_rules! define_validated_string {
    // PII アーム: Debug をマスク、Display を生成しない
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max_length:expr,
            pii: true $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis struct $Name(String);

        impl std::fmt::Debug for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($Name)).field(&"[REDACTED]").finish()
            }
        }

        _validated_string_common!($Name, $label, $max_length);
    };
    // 非 PII アーム: derive(Debug) + Display 生成
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max_length:expr
            $(, trim: $trim:literal)? $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis struct $Name(String);

        _validated_string_common!($Name, $label, $max_length $(, $trim)?);

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// SQL 識別子の一部として使われる String Newtype を定義する宣言型マクロ
///
/// メタデータ由来の名前はバインドパラメータにできず、SQL 文字列へ
/// 埋め込まれる。そのため生成時に以下を検証する:
///
/// - 空文字列ではない（trim はしない。メタデータ上の名前と完全一致させる）
/// - `$max_bytes` バイト以内（PostgreSQL の識別子長 63 バイト制限に由来）
/// - すべての文字が `$allowed` を満たす
///
/// `Display` と `Debug` を生成する。識別子は PII ではない。
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_bytes: $max_bytes:expr,
            allowed: $allowed:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        $vis struct $Name(String);

        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into();

                if value.is_empty() {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は必須です",
                        $label
                    )));
                }

                if value.len() > $max_bytes {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は {} バイト以内である必要があります: {:?}",
                        $label, $max_bytes, value
                    )));
                }

                let allowed: fn(char) -> bool = $allowed;
                if let Some(invalid) = value.chars().find(|c| !allowed(*c)) {
                    return Err($crate::DomainError::Validation(format!(
                        "{}に使用できない文字が含まれています: {:?} ({:?})",
                        $label, value, invalid
                    )));
                }

                Ok(Self(value))
            }

            /// 文字列参照を取得する
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
