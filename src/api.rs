//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::str::FromStr;

use crate::error::XlsxTableError;

/// 出力フォーマット
///
/// 抽出した表を`TableRenderer`で書き出す際の形式を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// `Table`の`Display`と同じ形式
    ///
    /// # 出力例
    ///
    /// ```text
    /// Name|Qty
    /// ===
    /// apple|3
    /// ```
    #[default]
    Plain,

    /// Markdownテーブル形式
    ///
    /// 列幅は表示幅（全角文字は2）で揃えます。
    ///
    /// # 出力例
    ///
    /// ```markdown
    /// | Name  | Qty |
    /// | ----- | --- |
    /// | apple | 3   |
    /// ```
    Markdown,

    /// CSV形式（ヘッダー行を含む）
    Csv,

    /// JSON形式
    ///
    /// # 出力例
    ///
    /// ```json
    /// {
    ///   "header": ["Name", "Qty"],
    ///   "rows": [["apple", "3"]]
    /// }
    /// ```
    Json,
}

impl FromStr for OutputFormat {
    type Err = XlsxTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(OutputFormat::Plain),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(XlsxTableError::Config(format!(
                "Unknown output format: '{}'",
                other
            ))),
        }
    }
}
