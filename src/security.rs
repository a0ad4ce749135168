//! Security Module
//!
//! 入力ファイルに対する制限を実装するモジュール。
//! ZIP bomb、パストラバーサル、巨大な入力への対策を提供します。

use std::io::{Read, Seek};

use zip::ZipArchive;

use crate::error::XlsxTableError;

/// 入力制限の設定
///
/// `ExtractorBuilder::with_limits`で変更できます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// 展開後の合計最大サイズ（バイト）
    /// デフォルト: 1GB
    pub max_decompressed_size: u64,
    /// ZIPアーカイブ内の最大エントリ数
    /// デフォルト: 10000
    pub max_file_count: usize,
    /// 単一エントリの最大サイズ（バイト）
    /// デフォルト: 100MB
    pub max_file_size: u64,
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: 1_073_741_824, // 1GB
            max_file_count: 10_000,
            max_file_size: 104_857_600,         // 100MB
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

impl SecurityConfig {
    /// 設定値を検証（0の上限は無効）
    pub(crate) fn validate(&self) -> Result<(), XlsxTableError> {
        let limits = [
            ("max_decompressed_size", self.max_decompressed_size),
            ("max_file_count", self.max_file_count as u64),
            ("max_file_size", self.max_file_size),
            ("max_input_file_size", self.max_input_file_size),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(XlsxTableError::Config(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }

    /// 入力全体を読み込み、サイズ上限を確認する
    pub(crate) fn read_input<R: Read>(&self, reader: R) -> Result<Vec<u8>, XlsxTableError> {
        // 上限 + 1バイトまで読めば超過を検出できる
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(self.max_input_file_size.saturating_add(1))
            .read_to_end(&mut buffer)?;

        if bytes_read as u64 > self.max_input_file_size {
            return Err(XlsxTableError::SecurityViolation(format!(
                "Input file size exceeds maximum: more than {} bytes",
                self.max_input_file_size
            )));
        }
        Ok(buffer)
    }

    /// ZIPアーカイブのエントリ数・サイズ・パスを検査する
    pub(crate) fn check_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
    ) -> Result<(), XlsxTableError> {
        if archive.len() > self.max_file_count {
            return Err(XlsxTableError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                self.max_file_count
            )));
        }

        let mut total_size = 0u64;
        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            let name = entry.name();
            validate_entry_name(name)?;

            let size = entry.size();
            if size > self.max_file_size {
                return Err(XlsxTableError::SecurityViolation(format!(
                    "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                    name, size, self.max_file_size
                )));
            }

            total_size = total_size.checked_add(size).ok_or_else(|| {
                XlsxTableError::SecurityViolation(
                    "Total decompressed size calculation overflow".to_string(),
                )
            })?;
            if total_size > self.max_decompressed_size {
                return Err(XlsxTableError::SecurityViolation(format!(
                    "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                    total_size, self.max_decompressed_size
                )));
            }
        }
        Ok(())
    }
}

/// ZIPエントリ名の検証
///
/// 空の名前、絶対パス、`..`を含むパス、バックスラッシュを拒否します。
pub(crate) fn validate_entry_name(name: &str) -> Result<(), XlsxTableError> {
    let reason = if name.is_empty() {
        Some("empty path")
    } else if name.starts_with('/') || name.get(1..3) == Some(":\\") || name.get(1..3) == Some(":/") {
        Some("absolute path")
    } else if name.split('/').any(|part| part == "..") {
        Some("path traversal")
    } else if name.contains('\\') {
        Some("backslash in path")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(XlsxTableError::SecurityViolation(format!(
            "Invalid ZIP path ({}): {}",
            reason, name
        ))),
        None => Ok(()),
    }
}
