//! Workbook Parser Module
//!
//! calamineのラッパーとして、最初のシートの読み込みを提供します。
//! calamineで取得できない罫線・数値書式・セルのスタイルIDは、同じバッファを
//! ZIPアーカイブとして開き、XMLパーツから直接取得します。

use std::io::{Cursor, Read};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xlsx};
use log::{debug, trace};
use quick_xml::events::Event;
use zip::ZipArchive;

use super::styles::StyleSheet;
use super::{attr_value, read_part, worksheet};
use crate::error::XlsxTableError;
use crate::formatter::CellFormatter;
use crate::security::SecurityConfig;
use crate::types::{Cell, CellCoord, CellValue, Sheet};

/// ワークブック内のシートの参照
#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetEntry {
    /// シート名
    name: String,
    /// ワークシートパーツのパス（例: "xl/worksheets/sheet1.xml"）
    part: String,
}

/// ワークブックパーサー
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
    /// XMLパーツ読み込み用のアーカイブ
    archive: ZipArchive<Cursor<Vec<u8>>>,
    styles: StyleSheet,
    first_sheet: SheetEntry,
    is_1904: bool,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// 入力全体をメモリに読み込み、サイズ制限とZIPエントリの検査を行ってから
    /// calamineで開きます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(XlsxTableError)` - I/O、ZIP、XML、calamineのエラー、または制限違反
    pub fn open<R: Read>(reader: R, limits: &SecurityConfig) -> Result<Self, XlsxTableError> {
        let buffer = limits.read_input(reader)?;

        // calamineより先に検査する（展開前にZIP bombを拒否するため）
        let mut archive = ZipArchive::new(Cursor::new(buffer.clone()))?;
        limits.check_archive(&mut archive)?;

        let workbook = match open_workbook_auto_from_rs(Cursor::new(buffer))? {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(XlsxTableError::Parse(calamine::Error::Msg(
                    "Only XLSX format is supported",
                )))
            }
        };

        let styles = match read_part(&mut archive, "xl/styles.xml")? {
            Some(xml) => StyleSheet::parse(&xml)?,
            None => StyleSheet::default(),
        };

        let workbook_xml = read_part(&mut archive, "xl/workbook.xml")?
            .ok_or_else(|| XlsxTableError::Xml("xl/workbook.xml not found".to_string()))?;
        let (first_sheet, is_1904) = parse_workbook(&workbook_xml)?;

        let rels_xml = read_part(&mut archive, "xl/_rels/workbook.xml.rels")?.ok_or_else(|| {
            XlsxTableError::Xml("xl/_rels/workbook.xml.rels not found".to_string())
        })?;
        let (name, rel_id) = first_sheet
            .ok_or_else(|| XlsxTableError::Xml("workbook contains no sheets".to_string()))?;
        let part = resolve_relationship(&rels_xml, &rel_id)?;

        debug!(
            "opened workbook: first sheet '{}' at {}, date1904={}",
            name, part, is_1904
        );

        Ok(Self {
            workbook,
            archive,
            styles,
            first_sheet: SheetEntry { name, part },
            is_1904,
        })
    }

    /// 最初のシート名
    pub fn first_sheet_name(&self) -> &str {
        &self.first_sheet.name
    }

    /// 最初のシートを読み込み、セルグリッドを構築
    ///
    /// 行は最後に定義された行まで並び、途中の未定義行は空の行になります。
    /// 各行の長さはその行で最後に定義されたセルまでで、途中の未定義セルは
    /// 罫線なしの空セルになります。
    pub fn first_sheet(&mut self, formatter: &CellFormatter) -> Result<Sheet, XlsxTableError> {
        let entry = self.first_sheet.clone();

        // 座標の範囲検査はcalamineが値のグリッドを確保する前に行う
        let xml = read_part(&mut self.archive, &entry.part)?.ok_or_else(|| {
            XlsxTableError::Xml(format!("worksheet part {} not found", entry.part))
        })?;
        let styled_cells = worksheet::parse_cells(&xml)?;

        let range = self
            .workbook
            .worksheet_range(&entry.name)
            .map_err(|e| XlsxTableError::Parse(e.into()))?;

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for styled in styled_cells {
            let row_idx = styled.coord.row as usize;
            let col_idx = styled.coord.col as usize;

            if rows.len() <= row_idx {
                rows.resize_with(row_idx + 1, Vec::new);
            }
            let row = &mut rows[row_idx];
            while row.len() <= col_idx {
                let coord = CellCoord::new(styled.coord.row, row.len() as u32);
                row.push(Cell::blank(coord));
            }
            row[col_idx] = self.build_cell(styled.coord, styled.style_id, &range, formatter);
        }

        debug!("loaded sheet '{}': {} rows", entry.name, rows.len());
        Ok(Sheet::new(entry.name, rows))
    }

    /// 値・表示値・罫線からセルを構築
    fn build_cell(
        &self,
        coord: CellCoord,
        style_id: u32,
        range: &Range<Data>,
        formatter: &CellFormatter,
    ) -> Cell {
        let value = range
            .get_value((coord.row, coord.col))
            .map(convert_value)
            .unwrap_or(CellValue::Empty);

        let format_code = self.styles.format_code(style_id);
        let formatted = match formatter.format(&value, format_code, self.is_1904) {
            Ok(text) => Some(text),
            Err(e) => {
                // 表示値が得られない場合は生の値を使う
                trace!("{}: {}; using raw value", coord.to_a1_notation(), e);
                None
            }
        };

        Cell {
            coord,
            value,
            formatted,
            border: self.styles.border(style_id),
        }
    }
}

/// calamineの値をセル値に変換
fn convert_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// xl/workbook.xmlから最初のシート（名前, r:id）と1904年エポックフラグを取得
#[allow(clippy::type_complexity)]
fn parse_workbook(xml: &[u8]) -> Result<(Option<(String, String)>, bool), XlsxTableError> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut first_sheet = None;
    let mut is_1904 = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"workbookPr" => {
                    is_1904 = matches!(
                        attr_value(&e, b"date1904")?.as_deref(),
                        Some("1") | Some("true")
                    );
                }
                b"sheet" if first_sheet.is_none() => {
                    let name = attr_value(&e, b"name")?;
                    let rel_id = attr_value(&e, b"id")?;
                    if let (Some(name), Some(rel_id)) = (name, rel_id) {
                        first_sheet = Some((name, rel_id));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((first_sheet, is_1904))
}

/// xl/_rels/workbook.xml.relsからリレーションIDのターゲットを解決
fn resolve_relationship(xml: &[u8], rel_id: &str) -> Result<String, XlsxTableError> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attr_value(&e, b"Id")?.as_deref() == Some(rel_id) {
                    let target = attr_value(&e, b"Target")?.ok_or_else(|| {
                        XlsxTableError::Xml(format!("relationship {} has no Target", rel_id))
                    })?;
                    return Ok(resolve_target(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Err(XlsxTableError::Xml(format!(
        "relationship {} not found",
        rel_id
    )))
}

/// リレーションのターゲットをアーカイブ内のパスに変換
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workbook() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <workbookPr date1904="1"/>
  <sheets>
    <sheet name="Data" sheetId="3" r:id="rId2"/>
    <sheet name="Other" sheetId="1" r:id="rId1"/>
  </sheets>
</workbook>"#;

        let (first, is_1904) = parse_workbook(xml.as_bytes()).unwrap();
        assert_eq!(first, Some(("Data".to_string(), "rId2".to_string())));
        assert!(is_1904);
    }

    #[test]
    fn test_parse_workbook_defaults() {
        let xml = r#"<workbook><workbookPr/><sheets/></workbook>"#;

        let (first, is_1904) = parse_workbook(xml.as_bytes()).unwrap();
        assert_eq!(first, None);
        assert!(!is_1904);
    }

    #[test]
    fn test_resolve_relationship() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
</Relationships>"#;

        assert_eq!(
            resolve_relationship(xml.as_bytes(), "rId1").unwrap(),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            resolve_relationship(xml.as_bytes(), "rId2").unwrap(),
            "xl/worksheets/sheet2.xml"
        );
        assert!(matches!(
            resolve_relationship(xml.as_bytes(), "rId9"),
            Err(XlsxTableError::Xml(_))
        ));
    }

    #[test]
    fn test_convert_value() {
        assert_eq!(convert_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_value(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(
            convert_value(&Data::String("x".to_string())),
            CellValue::String("x".to_string())
        );
        assert_eq!(convert_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            convert_value(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Error("#DIV/0!".to_string())
        );
        assert_eq!(convert_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_open_rejects_non_zip_input() {
        let result = WorkbookParser::open(Cursor::new(b"not a workbook".to_vec()), &SecurityConfig::default());
        match result {
            Err(e) => assert!(e.is_document_open_error()),
            Ok(_) => panic!("Expected an error for non-zip input"),
        }
    }
}
