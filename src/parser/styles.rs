//! Styles Parser Module
//!
//! `xl/styles.xml`から罫線定義（`<borders>`）、セル書式（`<cellXfs>`）、
//! カスタム数値書式（`<numFmts>`）を抽出します。calamineはこれらを公開しないため、
//! quick-xmlで直接解析します。

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::attr_value;
use crate::error::XlsxTableError;
use crate::types::{Border, BorderEdge};

/// セル書式（cellXfs要素の1項目）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CellXf {
    pub num_fmt_id: u32,
    pub border_id: u32,
}

/// 罫線の辺の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeKind {
    Left,
    Right,
    Top,
    Bottom,
}

impl EdgeKind {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"left" | b"start" => Some(EdgeKind::Left),
            b"right" | b"end" => Some(EdgeKind::Right),
            b"top" => Some(EdgeKind::Top),
            b"bottom" => Some(EdgeKind::Bottom),
            _ => None,
        }
    }

    fn slot(self, border: &mut Border) -> &mut Option<BorderEdge> {
        match self {
            EdgeKind::Left => &mut border.left,
            EdgeKind::Right => &mut border.right,
            EdgeKind::Top => &mut border.top,
            EdgeKind::Bottom => &mut border.bottom,
        }
    }
}

/// 解析済みのスタイルシート
#[derive(Debug, Clone, Default)]
pub(crate) struct StyleSheet {
    borders: Vec<Border>,
    cell_xfs: Vec<CellXf>,
    num_formats: HashMap<u32, String>,
}

impl StyleSheet {
    /// styles.xmlの内容を解析
    pub fn parse(xml: &[u8]) -> Result<Self, XlsxTableError> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut sheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_borders = false;
        let mut in_cell_xfs = false;
        let mut current_border: Option<Border> = None;
        let mut current_edge: Option<EdgeKind> = None;

        loop {
            let event = reader.read_event_into(&mut buf)?;
            match &event {
                Event::Start(e) | Event::Empty(e) => {
                    let self_closing = matches!(event, Event::Empty(_));
                    match e.local_name().as_ref() {
                        b"numFmts" => in_num_fmts = !self_closing,
                        b"numFmt" if in_num_fmts => {
                            // <numFmt numFmtId="164" formatCode="0.000"/>
                            let id = attr_value(e, b"numFmtId")?;
                            let code = attr_value(e, b"formatCode")?;
                            if let (Some(id), Some(code)) = (id, code) {
                                sheet.num_formats.insert(id.parse()?, code);
                            }
                        }
                        b"borders" => in_borders = !self_closing,
                        b"border" if in_borders => {
                            if self_closing {
                                sheet.borders.push(Border::empty());
                            } else {
                                current_border = Some(Border::empty());
                            }
                        }
                        name if current_border.is_some() && current_edge.is_none() => {
                            if let (Some(kind), Some(border)) =
                                (EdgeKind::from_name(name), current_border.as_mut())
                            {
                                *kind.slot(border) =
                                    attr_value(e, b"style")?.map(BorderEdge::new);
                                if !self_closing {
                                    current_edge = Some(kind);
                                }
                            }
                        }
                        b"color" => {
                            if let (Some(kind), Some(border)) = (current_edge, current_border.as_mut())
                            {
                                if let Some(edge) = kind.slot(border).as_mut() {
                                    edge.color = parse_color(e)?;
                                }
                            }
                        }
                        b"cellXfs" => in_cell_xfs = !self_closing,
                        b"xf" if in_cell_xfs => {
                            // <xf numFmtId="0" fontId="0" fillId="0" borderId="1" applyBorder="1"/>
                            let num_fmt_id = attr_value(e, b"numFmtId")?
                                .map(|v| v.parse())
                                .transpose()?
                                .unwrap_or(0);
                            let border_id = attr_value(e, b"borderId")?
                                .map(|v| v.parse())
                                .transpose()?
                                .unwrap_or(0);
                            sheet.cell_xfs.push(CellXf {
                                num_fmt_id,
                                border_id,
                            });
                        }
                        _ => {}
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"borders" => in_borders = false,
                    b"cellXfs" => in_cell_xfs = false,
                    b"border" => {
                        if let Some(border) = current_border.take() {
                            sheet.borders.push(border);
                        }
                    }
                    name if current_edge.is_some() && EdgeKind::from_name(name) == current_edge => {
                        current_edge = None;
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    /// スタイルIDに対応する罫線（未定義の場合は空の罫線）
    pub fn border(&self, style_id: u32) -> Border {
        self.cell_xfs
            .get(style_id as usize)
            .and_then(|xf| self.borders.get(xf.border_id as usize))
            .cloned()
            .unwrap_or_default()
    }

    /// スタイルIDに対応する数値書式
    ///
    /// 組み込み書式ID（0-163）は既定の書式文字列、それ以外は`<numFmts>`の定義を
    /// 返します。`<numFmts>`が組み込みIDを上書きしている場合はそちらを優先します。
    pub fn format_code(&self, style_id: u32) -> Option<&str> {
        let xf = self.cell_xfs.get(style_id as usize)?;
        self.num_formats
            .get(&xf.num_fmt_id)
            .map(String::as_str)
            .or_else(|| builtin_format_code(xf.num_fmt_id))
    }

    #[cfg(test)]
    pub(crate) fn borders(&self) -> &[Border] {
        &self.borders
    }
}

/// `<color>`要素を文字列表現に変換
fn parse_color(e: &BytesStart<'_>) -> Result<Option<String>, XlsxTableError> {
    if let Some(rgb) = attr_value(e, b"rgb")? {
        return Ok(Some(format!("rgb:{}", rgb)));
    }
    if let Some(indexed) = attr_value(e, b"indexed")? {
        return Ok(Some(format!("indexed:{}", indexed)));
    }
    if let Some(theme) = attr_value(e, b"theme")? {
        let tint = attr_value(e, b"tint")?;
        return Ok(Some(match tint {
            Some(tint) => format!("theme:{}:{}", theme, tint),
            None => format!("theme:{}", theme),
        }));
    }
    if attr_value(e, b"auto")?.as_deref() == Some("1") {
        return Ok(Some("auto".to_string()));
    }
    Ok(None)
}

/// 組み込み数値書式（ECMA-376 Part 1, 18.8.30）
pub(crate) fn builtin_format_code(id: u32) -> Option<&'static str> {
    let code = match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0 ;(#,##0)",
        38 => "#,##0 ;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    };
    Some(code)
}
