//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! ローダー（`parser`）が生成し、表領域の検出（`region`）が読み取る
//! シートのモデルを含みます。

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 値を文字列として取得（書式適用前）
    pub fn as_raw_string(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// セル座標（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列に変換（例: (0, 0) -> "A1"）
    pub fn to_a1_notation(self) -> String {
        format!("{}{}", Self::col_index_to_letter(self.col), self.row + 1)
    }

    /// A1形式の参照を座標に変換（例: "B3" -> (2, 1)）
    ///
    /// `$`による絶対参照記号は無視します。列または行が欠けている場合、
    /// 行番号が0の場合は`None`を返します。
    pub fn from_a1_notation(reference: &str) -> Option<Self> {
        let mut col: u32 = 0;
        let mut col_len = 0;
        let mut row: u32 = 0;
        let mut row_len = 0;

        for ch in reference.chars().filter(|&c| c != '$') {
            if ch.is_ascii_alphabetic() {
                // 行番号の後に列文字が現れるのは不正
                if row_len > 0 {
                    return None;
                }
                let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
                col = col.checked_mul(26)?.checked_add(digit)?;
                col_len += 1;
            } else if let Some(digit) = ch.to_digit(10) {
                row = row.checked_mul(10)?.checked_add(digit)?;
                row_len += 1;
            } else {
                return None;
            }
        }

        if col_len == 0 || row_len == 0 || row == 0 {
            return None;
        }
        Some(Self::new(row - 1, col - 1))
    }

    /// 列インデックスを文字列に変換（0 -> "A", 25 -> "Z", 26 -> "AA"）
    fn col_index_to_letter(mut col: u32) -> String {
        let mut result = String::new();
        loop {
            let remainder = col % 26;
            result.insert(0, (b'A' + remainder as u8) as char);
            if col < 26 {
                break;
            }
            col = col / 26 - 1;
        }
        result
    }
}

/// 罫線の1辺
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    /// 線種（例: "thin", "medium", "none"）
    pub style: String,
    /// 色（例: "rgb:FF000000", "indexed:64", "theme:1", "auto"）
    pub color: Option<String>,
}

impl BorderEdge {
    /// 色指定なしの辺を生成
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            color: None,
        }
    }

    /// 色指定付きの辺を生成
    pub fn with_color(style: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            color: Some(color.into()),
        }
    }
}

/// セルの罫線記述子
///
/// 4辺それぞれが未設定（`None`）か、線種を持つ辺（`Some`）です。
/// 比較は4辺をまとめた値として行います。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Border {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

impl Border {
    /// すべての辺が未設定の罫線
    pub fn empty() -> Self {
        Self::default()
    }

    /// ドキュメント既定の罫線（4辺とも線種"none"）
    pub fn default_style() -> Self {
        Self::uniform(BorderEdge::new("none"))
    }

    /// 4辺に同じ辺を設定した罫線
    pub fn uniform(edge: BorderEdge) -> Self {
        Self {
            left: Some(edge.clone()),
            right: Some(edge.clone()),
            top: Some(edge.clone()),
            bottom: Some(edge),
        }
    }
}

/// ローダーから渡される1セル
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// セル座標
    pub coord: CellCoord,

    /// 生の値
    pub value: CellValue,

    /// 書式適用済みの表示値（取得できなかった場合は`None`）
    pub formatted: Option<String>,

    /// 罫線
    pub border: Border,
}

impl Cell {
    /// 新しいセルを生成（表示値なし）
    pub fn new(coord: CellCoord, value: CellValue, border: Border) -> Self {
        Self {
            coord,
            value,
            formatted: None,
            border,
        }
    }

    /// 値も罫線もない空セル
    pub fn blank(coord: CellCoord) -> Self {
        Self::new(coord, CellValue::Empty, Border::empty())
    }

    /// 表示値を設定
    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = Some(formatted.into());
        self
    }

    /// 表示値、取得できない場合は生の値
    pub fn display_value(&self) -> String {
        match &self.formatted {
            Some(text) => text.clone(),
            None => self.value.as_raw_string(),
        }
    }
}

/// ワークシート1枚分のセルグリッド
///
/// `rows()[r][c]`が行`r`・列`c`のセルです。行ごとに長さが異なってもよく、
/// 空の行も許されます。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// 行のリストからシートを生成
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// シート名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// すべての行
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// 指定位置のセル（範囲外の場合は`None`）
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }
}

/// 検出された表の矩形領域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// 先頭行インデックス
    pub row: usize,
    /// 先頭列インデックス
    pub col: usize,
    /// 行数（DY）
    pub height: usize,
    /// 列数（DX）
    pub width: usize,
}

impl Region {
    /// 新しい領域を生成
    pub fn new(row: usize, col: usize, height: usize, width: usize) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }

    /// 指定位置が領域内にあるかを判定
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row
            && row < self.row + self.height
            && col >= self.col
            && col < self.col + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // CellValue のテスト
    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Number(42.0).is_empty());
        assert!(!CellValue::String("test".to_string()).is_empty());
    }

    #[test]
    fn test_cell_value_as_raw_string() {
        assert_eq!(CellValue::Empty.as_raw_string(), "");
        assert_eq!(CellValue::Number(42.5).as_raw_string(), "42.5");
        assert_eq!(CellValue::Number(7.0).as_raw_string(), "7");
        assert_eq!(CellValue::Bool(true).as_raw_string(), "true");
        assert_eq!(
            CellValue::Error("#DIV/0!".to_string()).as_raw_string(),
            "#DIV/0!"
        );
    }

    // CellCoord のテスト
    #[test]
    fn test_cell_coord_to_a1_notation() {
        assert_eq!(CellCoord::new(0, 0).to_a1_notation(), "A1");
        assert_eq!(CellCoord::new(0, 25).to_a1_notation(), "Z1");
        assert_eq!(CellCoord::new(0, 26).to_a1_notation(), "AA1");
        assert_eq!(CellCoord::new(99, 701).to_a1_notation(), "ZZ100");
    }

    #[test]
    fn test_cell_coord_from_a1_notation() {
        assert_eq!(CellCoord::from_a1_notation("A1"), Some(CellCoord::new(0, 0)));
        assert_eq!(CellCoord::from_a1_notation("B3"), Some(CellCoord::new(2, 1)));
        assert_eq!(
            CellCoord::from_a1_notation("AA10"),
            Some(CellCoord::new(9, 26))
        );
        assert_eq!(
            CellCoord::from_a1_notation("$C$4"),
            Some(CellCoord::new(3, 2))
        );
        assert_eq!(
            CellCoord::from_a1_notation("xfd1048576"),
            Some(CellCoord::new(1_048_575, 16_383))
        );

        assert_eq!(CellCoord::from_a1_notation(""), None);
        assert_eq!(CellCoord::from_a1_notation("A"), None);
        assert_eq!(CellCoord::from_a1_notation("12"), None);
        assert_eq!(CellCoord::from_a1_notation("A0"), None);
        assert_eq!(CellCoord::from_a1_notation("1A"), None);
        assert_eq!(CellCoord::from_a1_notation("A1:B2"), None);
    }

    // Border のテスト
    #[test]
    fn test_border_sentinels_differ() {
        assert_ne!(Border::empty(), Border::default_style());
        assert_eq!(Border::empty(), Border::default());
    }

    #[test]
    fn test_border_equality_is_composite() {
        let thin = Border::uniform(BorderEdge::new("thin"));
        let mut partial = Border::default_style();
        partial.bottom = Some(BorderEdge::new("thin"));

        assert_ne!(thin, partial);
        assert_ne!(partial, Border::default_style());
        assert_eq!(thin, Border::uniform(BorderEdge::new("thin")));
        assert_ne!(
            thin,
            Border::uniform(BorderEdge::with_color("thin", "indexed:64"))
        );
    }

    // Cell のテスト
    #[test]
    fn test_cell_display_value_fallback() {
        let coord = CellCoord::new(0, 0);
        let raw = Cell::new(coord, CellValue::Number(0.5), Border::empty());
        assert_eq!(raw.display_value(), "0.5");

        let formatted = raw.clone().with_formatted("50%");
        assert_eq!(formatted.display_value(), "50%");

        assert_eq!(Cell::blank(coord).display_value(), "");
    }

    // Sheet のテスト
    #[test]
    fn test_sheet_cell_out_of_range() {
        let sheet = Sheet::new(
            "Sheet1",
            vec![vec![Cell::blank(CellCoord::new(0, 0))], vec![]],
        );

        assert_eq!(sheet.name(), "Sheet1");
        assert!(sheet.cell(0, 0).is_some());
        assert!(sheet.cell(0, 1).is_none());
        assert!(sheet.cell(1, 0).is_none());
        assert!(sheet.cell(5, 0).is_none());
    }

    // Region のテスト
    #[test]
    fn test_region_contains() {
        let region = Region::new(1, 2, 3, 4);

        assert!(region.contains(1, 2));
        assert!(region.contains(3, 5));
        assert!(!region.contains(0, 2));
        assert!(!region.contains(4, 2));
        assert!(!region.contains(1, 6));
        assert!(!region.contains(1, 1));
    }
}
