//! Table Module
//!
//! 抽出結果の表（ヘッダー行 + データ行）を表すモジュール。

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// 罫線で囲まれた領域から抽出された表
///
/// 行0がヘッダー、行1以降がデータ行です。すべての行は同じ列数を持ち、
/// 少なくとも1行（ヘッダー）を含みます。構築後は変更できません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    data: Vec<Vec<String>>,
}

impl Table {
    /// 行データから表を生成
    ///
    /// 呼び出し側（`RegionExtractor`）が「1行以上・全行同じ長さ」を保証します。
    pub(crate) fn from_rows(data: Vec<Vec<String>>) -> Self {
        debug_assert!(!data.is_empty());
        debug_assert!(data.iter().all(|row| row.len() == data[0].len()));
        Self { data }
    }

    /// ヘッダー行
    pub fn header(&self) -> &[String] {
        &self.data[0]
    }

    /// データ行（ヘッダーを除く）
    pub fn rows(&self) -> &[Vec<String>] {
        &self.data[1..]
    }

    /// データ行の`row`行目・`col`列目の値（0始まり）
    ///
    /// `cell_at(0, 0)`はヘッダーの次の行の先頭セルです。
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&str> {
        self.rows()
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
    }

    /// 列数
    pub fn num_cols(&self) -> usize {
        self.data[0].len()
    }

    /// データ行の数
    pub fn num_rows(&self) -> usize {
        self.data.len() - 1
    }

    /// ヘッダーを含むすべての行
    pub fn all_rows(&self) -> &[Vec<String>] {
        &self.data
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header().join("|"))?;
        writeln!(f, "===")?;
        for row in self.rows() {
            writeln!(f, "{}", row.join("|"))?;
        }
        Ok(())
    }
}

/// `{"header": [...], "rows": [[...], ...]}`としてシリアライズ
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Table", 2)?;
        state.serialize_field("header", self.header())?;
        state.serialize_field("rows", self.rows())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(vec![
            vec!["Name".to_string(), "Qty".to_string()],
            vec!["apple".to_string(), "3".to_string()],
            vec!["pear".to_string(), "5".to_string()],
        ])
    }

    #[test]
    fn test_header_and_rows() {
        let table = sample();

        assert_eq!(table.header(), ["Name", "Qty"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1], ["pear", "5"]);
        assert_eq!(table.num_cols(), 2);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.all_rows().len(), 3);
    }

    #[test]
    fn test_cell_at_skips_header() {
        let table = sample();

        assert_eq!(table.cell_at(0, 0), Some("apple"));
        assert_eq!(table.cell_at(1, 1), Some("5"));
        assert_eq!(table.cell_at(2, 0), None);
        assert_eq!(table.cell_at(0, 2), None);
    }

    #[test]
    fn test_header_only_table() {
        let table = Table::from_rows(vec![vec!["only".to_string()]]);

        assert_eq!(table.header(), ["only"]);
        assert!(table.rows().is_empty());
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.cell_at(0, 0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "Name|Qty\n===\napple|3\npear|5\n");

        let header_only = Table::from_rows(vec![vec!["a".to_string(), "b".to_string()]]);
        assert_eq!(header_only.to_string(), "a|b\n===\n");
    }

    #[test]
    fn test_serialize_header_and_rows() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["header"], serde_json::json!(["Name", "Qty"]));
        assert_eq!(
            value["rows"],
            serde_json::json!([["apple", "3"], ["pear", "5"]])
        );
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
