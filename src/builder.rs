//! Builder Module
//!
//! Fluent Builder APIを提供し、`TableExtractor`インスタンスを段階的に構築する。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::border::BorderPredicate;
use crate::error::XlsxTableError;
use crate::formatter::CellFormatter;
use crate::parser::WorkbookParser;
use crate::region::RegionExtractor;
use crate::security::SecurityConfig;
use crate::table::Table;
use crate::types::{Border, Region, Sheet};

/// 抽出処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ExtractionConfig {
    /// 「罫線なし」とみなすデフォルトスタイル（全辺 "none"）
    pub default_border: Border,

    /// 「罫線なし」とみなす空の罫線（全辺未設定）
    pub empty_border: Border,

    /// 入力制限
    pub limits: SecurityConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_border: Border::default_style(),
            empty_border: Border::empty(),
            limits: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `TableExtractor`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxtable::ExtractorBuilder;
///
/// # fn main() -> Result<(), xlsxtable::XlsxTableError> {
/// let extractor = ExtractorBuilder::new()
///     .with_max_input_file_size(50 * 1024 * 1024)
///     .build()?;
/// let table = extractor.extract_path("report.xlsx")?;
/// println!("{}", table);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExtractorBuilder {
    /// 内部設定（構築中）
    config: ExtractionConfig,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - デフォルト罫線: 全辺 "none"
    /// - 空の罫線: 全辺未設定
    /// - 入力制限: `SecurityConfig::default()`
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// 「罫線なし」とみなすデフォルトスタイルを指定する
    ///
    /// セルの罫線がこの値と等しい場合、罫線付きとはみなしません。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxtable::{Border, BorderEdge, ExtractorBuilder};
    ///
    /// // 細い灰色の枠線を「罫線なし」として扱う
    /// let builder = ExtractorBuilder::new()
    ///     .with_default_border(Border::uniform(BorderEdge::with_color("hair", "rgb:FFC0C0C0")));
    /// ```
    pub fn with_default_border(mut self, border: Border) -> Self {
        self.config.default_border = border;
        self
    }

    /// 「罫線なし」とみなす空の罫線を指定する
    pub fn with_empty_border(mut self, border: Border) -> Self {
        self.config.empty_border = border;
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    pub fn with_max_input_file_size(mut self, bytes: u64) -> Self {
        self.config.limits.max_input_file_size = bytes;
        self
    }

    /// 入力制限をまとめて指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxtable::{ExtractorBuilder, SecurityConfig};
    ///
    /// let builder = ExtractorBuilder::new().with_limits(SecurityConfig {
    ///     max_file_count: 100,
    ///     ..SecurityConfig::default()
    /// });
    /// ```
    pub fn with_limits(mut self, limits: SecurityConfig) -> Self {
        self.config.limits = limits;
        self
    }

    /// 設定を検証し、`TableExtractor`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(TableExtractor)` - 設定が有効な場合
    /// * `Err(XlsxTableError::Config)` - 0の制限値が含まれる場合
    ///
    /// デフォルト罫線と空の罫線は同じ値でも構いません。
    pub fn build(self) -> Result<TableExtractor, XlsxTableError> {
        self.config.limits.validate()?;
        Ok(TableExtractor::new(self.config))
    }
}

/// 表抽出のファサード
///
/// XLSXファイルの最初のシートから罫線付きの表を取り出すメインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::fs::File;
/// use xlsxtable::ExtractorBuilder;
///
/// # fn main() -> Result<(), xlsxtable::XlsxTableError> {
/// let extractor = ExtractorBuilder::new().build()?;
/// let table = extractor.extract(File::open("report.xlsx")?)?;
/// for row in table.rows() {
///     println!("{}", row.join(", "));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TableExtractor {
    limits: SecurityConfig,
    region: RegionExtractor,
    formatter: CellFormatter,
}

impl TableExtractor {
    pub(crate) fn new(config: ExtractionConfig) -> Self {
        let predicate = BorderPredicate::new(config.default_border, config.empty_border);
        Self {
            limits: config.limits,
            region: RegionExtractor::new(predicate),
            formatter: CellFormatter::new(),
        }
    }

    /// 使用している罫線判定器
    pub fn predicate(&self) -> &BorderPredicate {
        self.region.predicate()
    }

    /// ワークブックを読み込み、最初のシートから表を抽出
    ///
    /// # 戻り値
    ///
    /// * `Ok(Table)` - 抽出に成功した場合
    /// * `Err(XlsxTableError)` - ワークブックを開けない場合はローダーのエラー、
    ///   罫線付きセルがない場合は`NoTableFound`
    pub fn extract<R: Read>(&self, input: R) -> Result<Table, XlsxTableError> {
        let sheet = self.load_first_sheet(input)?;
        self.extract_sheet(&sheet)
    }

    /// パスを指定してファイルから表を抽出
    pub fn extract_path<P: AsRef<Path>>(&self, path: P) -> Result<Table, XlsxTableError> {
        let path = path.as_ref();
        debug!("extracting table from {}", path.display());
        self.extract(File::open(path)?)
    }

    /// ワークブックを読み込み、最初のシートのセルグリッドを返す
    pub fn load_first_sheet<R: Read>(&self, input: R) -> Result<Sheet, XlsxTableError> {
        let mut parser = WorkbookParser::open(input, &self.limits)?;
        debug!("loading first sheet '{}'", parser.first_sheet_name());
        parser.first_sheet(&self.formatter)
    }

    /// 読み込み済みのシートから表を抽出
    pub fn extract_sheet(&self, sheet: &Sheet) -> Result<Table, XlsxTableError> {
        self.region.extract(sheet)
    }

    /// 罫線付き領域のみを検出
    pub fn find_region(&self, sheet: &Sheet) -> Result<Region, XlsxTableError> {
        self.region.find_region(sheet)
    }

    /// 検出済みの領域から表を構築
    pub fn build_table(&self, sheet: &Sheet, region: &Region) -> Table {
        self.region.build_table(sheet, region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BorderEdge, Cell, CellCoord, CellValue};

    fn bordered(row: u32, col: u32, text: &str) -> Cell {
        Cell::new(
            CellCoord::new(row, col),
            CellValue::String(text.to_string()),
            Border::uniform(BorderEdge::new("thin")),
        )
    }

    #[test]
    fn test_builder_defaults() {
        let extractor = ExtractorBuilder::new().build().unwrap();
        assert_eq!(extractor.predicate().default_border(), &Border::default_style());
        assert_eq!(extractor.predicate().empty_border(), &Border::empty());
        assert_eq!(extractor.limits, SecurityConfig::default());
    }

    #[test]
    fn test_builder_rejects_zero_input_size() {
        let result = ExtractorBuilder::new().with_max_input_file_size(0).build();
        assert!(matches!(result, Err(XlsxTableError::Config(_))));
    }

    #[test]
    fn test_builder_allows_equal_sentinels() {
        let extractor = ExtractorBuilder::new()
            .with_default_border(Border::empty())
            .with_empty_border(Border::empty())
            .build()
            .unwrap();
        assert_eq!(
            extractor.predicate().default_border(),
            extractor.predicate().empty_border()
        );
    }

    #[test]
    fn test_custom_default_border_is_not_a_border() {
        let thin = Border::uniform(BorderEdge::new("thin"));
        let extractor = ExtractorBuilder::new()
            .with_default_border(thin)
            .build()
            .unwrap();

        let sheet = Sheet::new("Sheet1", vec![vec![bordered(0, 0, "a")]]);
        match extractor.extract_sheet(&sheet) {
            Err(XlsxTableError::NoTableFound { sheet }) => assert_eq!(sheet, "Sheet1"),
            other => panic!("Expected NoTableFound, got {:?}", other),
        }
    }

    #[test]
    fn test_find_region_and_build_table() {
        let extractor = ExtractorBuilder::new().build().unwrap();
        let sheet = Sheet::new(
            "Sheet1",
            vec![
                vec![Cell::blank(CellCoord::new(0, 0)), bordered(0, 1, "h")],
                vec![Cell::blank(CellCoord::new(1, 0)), bordered(1, 1, "v")],
            ],
        );

        let region = extractor.find_region(&sheet).unwrap();
        assert_eq!(region, Region::new(0, 1, 2, 1));

        let table = extractor.build_table(&sheet, &region);
        assert_eq!(table.header(), &["h".to_string()]);
        assert_eq!(table.cell_at(0, 0), Some("v"));
    }
}
