//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxtableクレート全体で使用するエラー型
///
/// エラーは大きく2種類に分かれます。
///
/// - ドキュメントを開く際のエラー（`Io`, `Parse`, `Utf8`, `ParseInt`, `Zip`,
///   `Xml`, `SecurityViolation`）: ローダーからそのまま伝播されます。
/// - `NoTableFound`: シート内に罫線付きセルが1つも存在しない場合。
///
/// `Config`はビルダーの設定検証、`UnsupportedFormat`はセル書式の適用失敗を
/// 表します。後者はローダー内部で生の値へのフォールバックに使われ、
/// 抽出APIの呼び出し元に返ることはありません。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxtable::XlsxTableError;
///
/// match xlsxtable::extract_table("report.xlsx") {
///     Ok(table) => println!("{}", table),
///     Err(XlsxTableError::NoTableFound { sheet }) => {
///         eprintln!("シート '{}' に表が見つかりません", sheet);
///     }
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxTableError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// calamineがワークブックを解析する際に発生したエラー
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// 数値属性の解析エラー（`borderId`、`numFmtId`など）
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// XMLパーツの解析エラー
    #[error("XML error: {0}")]
    Xml(String),

    /// 設定の検証に失敗したエラー
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力サイズ制限などに違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// 数値書式を適用できなかったエラー
    ///
    /// ローダーはこのエラーを受け取ると、表示値の代わりに生の値を使用します。
    #[error("Unsupported number format: {0}")]
    UnsupportedFormat(String),

    /// 罫線付きセルが1つも見つからなかった
    #[error("No bordered table found in sheet '{sheet}'")]
    NoTableFound {
        /// 走査したシート名
        sheet: String,
    },
}

impl XlsxTableError {
    /// ドキュメントを開く段階のエラーかどうか
    ///
    /// `NoTableFound`・`Config`・`UnsupportedFormat`以外はすべて
    /// ローダー由来のエラーです。
    pub fn is_document_open_error(&self) -> bool {
        !matches!(
            self,
            XlsxTableError::NoTableFound { .. }
                | XlsxTableError::Config(_)
                | XlsxTableError::UnsupportedFormat(_)
        )
    }
}

impl From<zip::result::ZipError> for XlsxTableError {
    fn from(err: zip::result::ZipError) -> Self {
        XlsxTableError::Zip(err.to_string())
    }
}

impl From<quick_xml::Error> for XlsxTableError {
    fn from(err: quick_xml::Error) -> Self {
        XlsxTableError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for XlsxTableError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        XlsxTableError::Xml(format!("attribute error: {}", err))
    }
}
