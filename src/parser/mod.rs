//! Parser Module
//!
//! XLSXファイルから最初のシートを読み込み、罫線・値・表示値を持つ
//! セルグリッド（`Sheet`）を構築します。
//! 値はcalamine、罫線と書式はXMLを直接解析して取得します。

mod styles;
mod workbook;
mod worksheet;

use std::io::{Read, Seek};

use quick_xml::events::BytesStart;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::XlsxTableError;

pub(crate) use workbook::WorkbookParser;

/// 要素の属性値を取得（名前空間接頭辞は無視）
pub(crate) fn attr_value(
    element: &BytesStart<'_>,
    name: &[u8],
) -> Result<Option<String>, XlsxTableError> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            let raw = std::str::from_utf8(&attr.value)?;
            let value = quick_xml::escape::unescape(raw)
                .map_err(|e| XlsxTableError::Xml(format!("attribute value: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// ZIPアーカイブ内のパーツを読み込む（存在しない場合は`None`）
pub(crate) fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, XlsxTableError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn first_element(xml: &str) -> BytesStart<'static> {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => return e.into_owned(),
                Event::Eof => panic!("no element in {}", xml),
                _ => {}
            }
        }
    }

    #[test]
    fn test_attr_value_unescapes_entities() {
        let element = first_element(r#"<sheet name="P&amp;L &lt;2024&gt;" r:id="rId1"/>"#);

        assert_eq!(
            attr_value(&element, b"name").unwrap().as_deref(),
            Some("P&L <2024>")
        );
        assert_eq!(attr_value(&element, b"id").unwrap().as_deref(), Some("rId1"));
        assert_eq!(attr_value(&element, b"missing").unwrap(), None);
    }

    #[test]
    fn test_attr_value_rejects_unknown_entity() {
        let element = first_element(r#"<sheet name="a &bogus; b"/>"#);
        assert!(matches!(
            attr_value(&element, b"name"),
            Err(XlsxTableError::Xml(_))
        ));
    }
}
