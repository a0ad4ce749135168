//! xlsxtable - Extract the bordered table from the first sheet of an XLSX workbook
//!
//! Spreadsheets often carry one "real" table drawn with cell borders, surrounded
//! by titles, notes and scratch cells. This crate finds that table by its borders
//! and returns it as a header row plus data rows of display strings.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = xlsxtable::extract_table("report.xlsx")?;
//!
//!     println!("columns: {}", table.header().join(", "));
//!     for row in table.rows() {
//!         println!("{}", row.join(" / "));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # How the table is found
//!
//! The first sheet is scanned row by row, left to right. The first cell with a
//! border (anything other than the default "none" style or an unset border) is
//! the origin. The width is the run of bordered cells to its right on that row;
//! the height is the run of bordered cells below it in the origin column. The
//! first row of that rectangle is the header.
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxtable::{ExtractorBuilder, OutputFormat, TableRenderer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ExtractorBuilder::new()
//!         .with_max_input_file_size(10 * 1024 * 1024)
//!         .build()?;
//!
//!     let table = extractor.extract(File::open("report.xlsx")?)?;
//!     TableRenderer::new(OutputFormat::Markdown).render(&table, &mut std::io::stdout())?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Working with the sheet directly
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxtable::ExtractorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ExtractorBuilder::new().build()?;
//!     let sheet = extractor.load_first_sheet(File::open("report.xlsx")?)?;
//!
//!     let region = extractor.find_region(&sheet)?;
//!     println!("table at row {}, col {}", region.row, region.col);
//!
//!     let table = extractor.build_table(&sheet, &region);
//!     println!("{}", table);
//!
//!     Ok(())
//! }
//! ```

mod api;
mod border;
mod builder;
mod error;
mod formatter;
mod output;
mod parser;
mod region;
mod security;
mod table;
mod types;

use std::path::Path;

// 公開API
pub use api::OutputFormat;
pub use border::BorderPredicate;
pub use builder::{ExtractorBuilder, TableExtractor};
pub use error::XlsxTableError;
pub use output::TableRenderer;
pub use region::RegionExtractor;
pub use security::SecurityConfig;
pub use table::Table;
pub use types::{Border, BorderEdge, Cell, CellCoord, CellValue, Region, Sheet};

/// デフォルト設定でファイルを開き、最初のシートから表を抽出する
///
/// `ExtractorBuilder::new().build()?.extract_path(path)`と同じです。
///
/// # 戻り値
///
/// * `Ok(Table)` - 抽出に成功した場合
/// * `Err(XlsxTableError)` - ファイルを開けない、または罫線付きセルがない場合
pub fn extract_table<P: AsRef<Path>>(path: P) -> Result<Table, XlsxTableError> {
    ExtractorBuilder::new().build()?.extract_path(path)
}
