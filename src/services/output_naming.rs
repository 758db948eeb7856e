//! 输出文件命名 - 业务能力层
//!
//! 只负责"源文件名 → PDF 文件名"的推导，以及 `%20` 还原。

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::FileError;

/// 编码后的空格
pub const ENCODED_SPACE: &str = "%20";

/// 由源文件名推导 PDF 文件名
///
/// 去掉结尾的 `.xls` / `.xlsx` 后追加 `.pdf`；没有这两种后缀时
/// 直接在完整文件名后追加 `.pdf`（`a.pdf` 会变成 `a.pdf.pdf`）。
pub fn derive_pdf_name(basename: &str) -> String {
    static SPREADSHEET_SUFFIX: OnceLock<Regex> = OnceLock::new();
    let re = SPREADSHEET_SUFFIX.get_or_init(|| Regex::new(r"\.xlsx?$").expect("valid regex"));

    format!("{}.pdf", re.replace(basename, ""))
}

/// 同 `derive_pdf_name`，但不要求文件名是合法 UTF-8
///
/// 非 UTF-8 文件名按原始字节保留，只处理扩展名。
pub fn derive_pdf_os_name(basename: &OsStr) -> OsString {
    if let Some(name) = basename.to_str() {
        return derive_pdf_name(name).into();
    }

    let path = Path::new(basename);
    match path.extension().and_then(OsStr::to_str) {
        Some("xls") | Some("xlsx") => path.with_extension("pdf").into_os_string(),
        _ => {
            let mut name = basename.to_os_string();
            name.push(".pdf");
            name
        }
    }
}

/// 计算源文件在输出目录中对应的 PDF 路径
pub fn derive_output_path(source: &Path, output_dir: &Path) -> Result<PathBuf, FileError> {
    let basename = source
        .file_name()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| FileError::InvalidFileName {
            path: source.to_path_buf(),
        })?;

    Ok(normalize_path(&output_dir.join(derive_pdf_os_name(basename))))
}

/// 按本机路径习惯重建路径：统一分隔符，去掉 `.` 组件
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// 文件名中的 `%20` 全部替换为空格；不含 `%20` 时返回 `None`
pub fn decode_spaces(basename: &str) -> Option<String> {
    basename
        .contains(ENCODED_SPACE)
        .then(|| basename.replace(ENCODED_SPACE, " "))
}

/// 同 `decode_spaces`，非 UTF-8 文件名按字节替换，其余字节保持不变
pub fn decode_os_spaces(basename: &OsStr) -> Option<OsString> {
    match basename.to_str() {
        Some(name) => decode_spaces(name).map(OsString::from),
        None => decode_raw_spaces(basename),
    }
}

#[cfg(unix)]
fn decode_raw_spaces(basename: &OsStr) -> Option<OsString> {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let bytes = basename.as_bytes();
    let pattern = ENCODED_SPACE.as_bytes();
    if !bytes.windows(pattern.len()).any(|w| w == pattern) {
        return None;
    }

    let mut decoded = Vec::with_capacity(bytes.len());
    let mut rest = bytes;
    while !rest.is_empty() {
        if rest.starts_with(pattern) {
            decoded.push(b' ');
            rest = &rest[pattern.len()..];
        } else {
            decoded.push(rest[0]);
            rest = &rest[1..];
        }
    }
    Some(OsString::from_vec(decoded))
}

// 其他平台上的非 Unicode 文件名保持原样
#[cfg(not(unix))]
fn decode_raw_spaces(_basename: &OsStr) -> Option<OsString> {
    None
}
