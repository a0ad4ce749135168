//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use std::io::Write;

use unicode_width::UnicodeWidthStr;

use crate::error::XlsxTableError;
use crate::table::Table;

/// `Display`と同じ形式のフォーマッター
pub(crate) struct PlainFormatter;

impl PlainFormatter {
    pub fn render<W: Write>(&self, table: &Table, writer: &mut W) -> Result<(), XlsxTableError> {
        write!(writer, "{}", table)?;
        writer.flush()?;
        Ok(())
    }
}

/// Markdown形式のフォーマッター
pub(crate) struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn render<W: Write>(&self, table: &Table, writer: &mut W) -> Result<(), XlsxTableError> {
        let rows: Vec<Vec<String>> = table
            .all_rows()
            .iter()
            .map(|row| row.iter().map(|cell| escape_markdown(cell)).collect())
            .collect();

        // 区切り行は最低3文字
        let mut widths = vec![3usize; table.num_cols()];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        for (row_idx, row) in rows.iter().enumerate() {
            write!(writer, "|")?;
            for (cell, &width) in row.iter().zip(&widths) {
                let padding = width - cell.width();
                write!(writer, " {}{} |", cell, " ".repeat(padding))?;
            }
            writeln!(writer)?;

            if row_idx == 0 {
                write!(writer, "|")?;
                for &width in &widths {
                    write!(writer, " {} |", "-".repeat(width))?;
                }
                writeln!(writer)?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

/// JSON形式のフォーマッター
pub(crate) struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(&self, table: &Table, writer: &mut W) -> Result<(), XlsxTableError> {
        serde_json::to_writer_pretty(&mut *writer, table).map_err(|e| {
            XlsxTableError::Config(format!("JSON serialization error: {}", e))
        })?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// CSV形式のフォーマッター
pub(crate) struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(&self, table: &Table, writer: &mut W) -> Result<(), XlsxTableError> {
        for row in table.all_rows() {
            let line: Vec<String> = row.iter().map(|cell| escape_csv(cell)).collect();
            writeln!(writer, "{}", line.join(","))?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// CSV文字列をエスケープ
///
/// ダブルクォート、改行、カンマを含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Markdownテーブルのセル内で特別な意味を持つ文字をエスケープ
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_rows(vec![
            vec!["Name".to_string(), "Qty".to_string()],
            vec!["apple".to_string(), "3".to_string()],
            vec!["りんご".to_string(), "1,200".to_string()],
        ])
    }

    fn render_with<F>(render: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), XlsxTableError>,
    {
        let mut buffer = Vec::new();
        render(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_plain() {
        let output = render_with(|w| PlainFormatter.render(&sample(), w));
        assert_eq!(output, "Name|Qty\n===\napple|3\nりんご|1,200\n");
    }

    #[test]
    fn test_markdown_aligns_by_display_width() {
        let output = render_with(|w| MarkdownFormatter.render(&sample(), w));
        let expected = "\
| Name   | Qty   |
| ------ | ----- |
| apple  | 3     |
| りんご | 1,200 |
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_markdown_escapes_pipes_and_newlines() {
        let table = Table::from_rows(vec![vec!["a|b".to_string()], vec!["x\ny".to_string()]]);
        let output = render_with(|w| MarkdownFormatter.render(&table, w));
        assert!(output.contains("a\\|b"));
        assert!(output.contains("x<br>y"));
    }

    #[test]
    fn test_csv() {
        let output = render_with(|w| CsvFormatter.render(&sample(), w));
        assert_eq!(output, "Name,Qty\napple,3\nりんご,\"1,200\"\n");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("a\nb"), "\"a\nb\"");
    }

    #[test]
    fn test_json() {
        let output = render_with(|w| JsonFormatter.render(&sample(), w));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["header"], json!(["Name", "Qty"]));
        assert_eq!(value["rows"], json!([["apple", "3"], ["りんご", "1,200"]]));
    }

    #[test]
    fn test_json_header_only() {
        let table = Table::from_rows(vec![vec!["only".to_string()]]);
        let output = render_with(|w| JsonFormatter.render(&table, w));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["rows"], json!([]));
    }
}
