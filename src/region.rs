//! Region Extractor Module
//!
//! シートを走査して罫線付きの矩形領域を求め、その領域から表を構築する。
//!
//! 領域は次の2段階で決まります。
//!
//! 1. 行を上から、各行のセルを左から走査し、最初に見つかった罫線付きセルを
//!    原点とする。同じ行で原点から連続する罫線付きセルの数が列数（DX）。
//!    列数はこの1行だけで決まり、後続の行がより広くても変わらない。
//! 2. 原点の行から下へ、原点の列のセルだけを調べ、罫線が続く間の行数が
//!    行数（DY）。原点の列に届かない短い行で終了する。
//!
//! 一般的なバウンディングボックス計算ではなく、この貪欲な手順そのものが
//! 抽出結果を決めます。

use log::debug;

use crate::border::BorderPredicate;
use crate::error::XlsxTableError;
use crate::table::Table;
use crate::types::{Region, Sheet};

/// 表領域の抽出器
#[derive(Debug, Clone, Default)]
pub struct RegionExtractor {
    predicate: BorderPredicate,
}

impl RegionExtractor {
    /// 罫線判定器を指定して生成
    pub fn new(predicate: BorderPredicate) -> Self {
        Self { predicate }
    }

    /// 使用している罫線判定器
    pub fn predicate(&self) -> &BorderPredicate {
        &self.predicate
    }

    /// 罫線付き領域を検出
    ///
    /// # 戻り値
    ///
    /// * `Ok(Region)` - 原点・行数・列数（行数・列数はともに1以上）
    /// * `Err(XlsxTableError::NoTableFound)` - 罫線付きセルが1つもない場合
    pub fn find_region(&self, sheet: &Sheet) -> Result<Region, XlsxTableError> {
        let rows = sheet.rows();

        // 1. 原点と列数
        let (origin_row, origin_col, width) = rows
            .iter()
            .enumerate()
            .find_map(|(row_idx, row)| {
                let col_idx = row
                    .iter()
                    .position(|cell| self.predicate.has_border(Some(cell)))?;
                let width = row[col_idx..]
                    .iter()
                    .take_while(|cell| self.predicate.has_border(Some(cell)))
                    .count();
                Some((row_idx, col_idx, width))
            })
            .ok_or_else(|| XlsxTableError::NoTableFound {
                sheet: sheet.name().to_string(),
            })?;

        // 2. 行数（原点の列のみを調べる）
        let height = rows[origin_row..]
            .iter()
            .take_while(|row| self.predicate.has_border(row.get(origin_col)))
            .count();

        let region = Region::new(origin_row, origin_col, height, width);
        debug!(
            "bordered region in '{}': origin ({}, {}), {} rows x {} cols",
            sheet.name(),
            origin_row,
            origin_col,
            height,
            width
        );
        Ok(region)
    }

    /// 領域内のセルの表示値から表を構築
    ///
    /// 表示値が取得できないセルは生の値を使い、`\ `（バックスラッシュ +
    /// 空白）は空白に置き換えます。後続の行が領域の右端まで届かない場合、
    /// 足りないセルは空文字列になります。
    pub fn build_table(&self, sheet: &Sheet, region: &Region) -> Table {
        let data = (region.row..region.row + region.height)
            .map(|row_idx| {
                (region.col..region.col + region.width)
                    .map(|col_idx| {
                        sheet
                            .cell(row_idx, col_idx)
                            .map(|cell| unescape_spaces(&cell.display_value()))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Table::from_rows(data)
    }

    /// 領域の検出と表の構築をまとめて実行
    pub fn extract(&self, sheet: &Sheet) -> Result<Table, XlsxTableError> {
        let region = self.find_region(sheet)?;
        Ok(self.build_table(sheet, &region))
    }
}

/// `\ `を空白に置き換える
pub(crate) fn unescape_spaces(value: &str) -> String {
    value.replace("\\ ", " ")
}
