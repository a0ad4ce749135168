//! Border Predicate Module
//!
//! セルが罫線で囲まれた表の一部かどうかを判定するモジュール。

use crate::types::{Border, Cell};

/// 罫線判定器
///
/// 「既定の罫線」と「空の罫線」の2つの基準値を保持し、セルの罫線が
/// そのどちらとも異なる場合にのみ罫線ありと判定します。
/// 辺ごとの判定は行わず、4辺をまとめた値として比較します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderPredicate {
    default_border: Border,
    empty_border: Border,
}

impl BorderPredicate {
    /// 基準値を指定して判定器を生成
    pub fn new(default_border: Border, empty_border: Border) -> Self {
        Self {
            default_border,
            empty_border,
        }
    }

    /// セルが罫線を持つかどうか
    ///
    /// `None`（セルが存在しない）は常に`false`です。
    pub fn has_border(&self, cell: Option<&Cell>) -> bool {
        match cell {
            Some(cell) => cell.border != self.default_border && cell.border != self.empty_border,
            None => false,
        }
    }

    /// 既定の罫線
    pub fn default_border(&self) -> &Border {
        &self.default_border
    }

    /// 空の罫線
    pub fn empty_border(&self) -> &Border {
        &self.empty_border
    }
}

impl Default for BorderPredicate {
    fn default() -> Self {
        Self::new(Border::default_style(), Border::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BorderEdge, CellCoord, CellValue};

    fn cell_with(border: Border) -> Cell {
        Cell::new(CellCoord::new(0, 0), CellValue::Empty, border)
    }

    #[test]
    fn test_missing_cell_has_no_border() {
        assert!(!BorderPredicate::default().has_border(None));
    }

    #[test]
    fn test_sentinels_have_no_border() {
        let predicate = BorderPredicate::default();

        assert!(!predicate.has_border(Some(&cell_with(Border::empty()))));
        assert!(!predicate.has_border(Some(&cell_with(Border::default_style()))));
    }

    #[test]
    fn test_custom_border() {
        let predicate = BorderPredicate::default();
        let thin = Border::uniform(BorderEdge::with_color("thin", "indexed:64"));

        assert!(predicate.has_border(Some(&cell_with(thin))));
    }

    #[test]
    fn test_single_custom_edge_counts() {
        let predicate = BorderPredicate::default();

        let mut partial = Border::default_style();
        partial.top = Some(BorderEdge::new("medium"));
        assert!(predicate.has_border(Some(&cell_with(partial))));

        let only_left = Border {
            left: Some(BorderEdge::new("thin")),
            ..Border::empty()
        };
        assert!(predicate.has_border(Some(&cell_with(only_left))));
    }

    #[test]
    fn test_configured_sentinels() {
        let thin = Border::uniform(BorderEdge::new("thin"));
        let predicate = BorderPredicate::new(thin.clone(), Border::empty());

        assert_eq!(predicate.default_border(), &thin);
        assert_eq!(predicate.empty_border(), &Border::empty());

        // thinが既定値扱いになり、"none"の4辺は罫線ありと判定される
        assert!(!predicate.has_border(Some(&cell_with(thin))));
        assert!(predicate.has_border(Some(&cell_with(Border::default_style()))));
    }
}
