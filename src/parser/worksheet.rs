//! Worksheet Parser Module
//!
//! ワークシートXML（`xl/worksheets/sheetN.xml`）の`<sheetData>`から、
//! 各セルの座標とスタイルIDを取り出します。値はcalamineから取得するため、
//! ここでは扱いません。

use quick_xml::events::Event;
use quick_xml::Reader;

use super::attr_value;
use crate::error::XlsxTableError;
use crate::types::CellCoord;

/// ワークシートの最大行数（1,048,576行）
const MAX_ROWS: u32 = 1 << 20;
/// ワークシートの最大列数（16,384列、XFD）
const MAX_COLS: u32 = 1 << 14;

/// `<c>`要素1つ分の位置とスタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StyledCell {
    pub coord: CellCoord,
    pub style_id: u32,
}

/// ワークシートXMLを解析し、定義されているセルを文書順に返す
///
/// `r`属性が省略された行・セルは直前の行・セルの次として扱います。
pub(crate) fn parse_cells(xml: &[u8]) -> Result<Vec<StyledCell>, XlsxTableError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut cells = Vec::new();
    let mut buf = Vec::new();
    let mut in_sheet_data = false;
    let mut next_row: u32 = 0;
    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match &event {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"sheetData" => in_sheet_data = matches!(event, Event::Start(_)),
                b"row" if in_sheet_data => {
                    current_row = match attr_value(e, b"r")? {
                        Some(r) => r.parse::<u32>()?.checked_sub(1).ok_or_else(|| {
                            XlsxTableError::Xml("row index must be 1 or greater".to_string())
                        })?,
                        None => next_row,
                    };
                    check_bounds(CellCoord::new(current_row, 0))?;
                    next_row = current_row + 1;
                    next_col = 0;
                }
                b"c" if in_sheet_data => {
                    let coord = match attr_value(e, b"r")? {
                        Some(reference) => CellCoord::from_a1_notation(&reference).ok_or_else(
                            || XlsxTableError::Xml(format!("invalid cell reference: {}", reference)),
                        )?,
                        None => CellCoord::new(current_row, next_col),
                    };
                    check_bounds(coord)?;
                    let style_id = attr_value(e, b"s")?
                        .map(|s| s.parse())
                        .transpose()?
                        .unwrap_or(0);

                    next_col = coord.col + 1;
                    cells.push(StyledCell { coord, style_id });
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"sheetData" => {
                in_sheet_data = false;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(cells)
}

/// シートの範囲外の座標を拒否する
///
/// グリッドは最大の座標まで確保されるため、巨大な参照は展開前に止める。
fn check_bounds(coord: CellCoord) -> Result<(), XlsxTableError> {
    if coord.row >= MAX_ROWS || coord.col >= MAX_COLS {
        return Err(XlsxTableError::SecurityViolation(format!(
            "Cell reference out of sheet bounds: row {}, column {} (max: {} rows, {} columns)",
            coord.row as u64 + 1,
            coord.col as u64 + 1,
            MAX_ROWS,
            MAX_COLS
        )));
    }
    Ok(())
}
