//! Output Format Module
//!
//! 抽出した表を各形式で書き出すモジュール。

mod formatters;

use std::io::Write;

use crate::api::OutputFormat;
use crate::error::XlsxTableError;
use crate::table::Table;

use formatters::{CsvFormatter, JsonFormatter, MarkdownFormatter, PlainFormatter};

/// 表のレンダラー
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxtable::{OutputFormat, TableRenderer};
///
/// # fn main() -> Result<(), xlsxtable::XlsxTableError> {
/// let table = xlsxtable::extract_table("report.xlsx")?;
/// TableRenderer::new(OutputFormat::Markdown).render(&table, &mut std::io::stdout())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer {
    format: OutputFormat,
}

impl TableRenderer {
    /// 出力フォーマットを指定して生成
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// 出力フォーマット
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// 表を書き出す
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(XlsxTableError)` - 書き込みに失敗した場合
    pub fn render<W: Write>(&self, table: &Table, writer: &mut W) -> Result<(), XlsxTableError> {
        match self.format {
            OutputFormat::Plain => PlainFormatter.render(table, writer),
            OutputFormat::Markdown => MarkdownFormatter.render(table, writer),
            OutputFormat::Csv => CsvFormatter.render(table, writer),
            OutputFormat::Json => JsonFormatter.render(table, writer),
        }
    }

    /// 表を文字列として書き出す
    pub fn render_to_string(&self, table: &Table) -> Result<String, XlsxTableError> {
        let mut buffer = Vec::new();
        self.render(table, &mut buffer)?;
        Ok(String::from_utf8(buffer).map_err(|e| e.utf8_error())?)
    }
}
