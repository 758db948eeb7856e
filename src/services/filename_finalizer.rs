//! 文件名整理 - 业务能力层
//!
//! 转换结束后把输出 PDF 文件名中的 `%20` 还原为空格。
//! 单个文件失败只记录，不影响其余文件。

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::FileError;
use crate::models::RenameOutcome;
use crate::services::event_sink::{log_info, log_warn, EventSink};
use crate::services::output_naming::decode_os_spaces;

/// 整理所有输出文件名
///
/// 同一组路径执行第二次时不会再发生重命名。
pub async fn finalize_outputs(paths: &[PathBuf], sink: &dyn EventSink) -> Vec<RenameOutcome> {
    let mut outcomes = Vec::with_capacity(paths.len());
    for path in paths {
        outcomes.push(finalize_one(path, sink).await);
    }
    outcomes
}

async fn finalize_one(path: &Path, sink: &dyn EventSink) -> RenameOutcome {
    let decoded = path
        .file_name()
        .and_then(decode_os_spaces);

    let Some(new_name) = decoded else {
        debug!("文件名无需整理: {}", path.display());
        return RenameOutcome::Unchanged {
            path: path.to_path_buf(),
        };
    };

    if !matches!(fs::try_exists(path).await, Ok(true)) {
        log_warn(sink, format!("⚠️ 文件不存在，跳过重命名: {}", path.display()));
        return RenameOutcome::NotFound {
            path: path.to_path_buf(),
        };
    }

    let target = path.with_file_name(&new_name);
    match rename_no_clobber(path, &target).await {
        Ok(()) => {
            log_info(
                sink,
                format!("✓ 已重命名: {} -> {}", path.display(), target.display()),
            );
            RenameOutcome::Renamed {
                from: path.to_path_buf(),
                to: target,
            }
        }
        Err(e) => {
            log_warn(sink, format!("❌ 重命名失败 {}: {}", path.display(), e));
            RenameOutcome::Failed {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}

/// 重命名，目标已存在时失败而不是覆盖
async fn rename_no_clobber(from: &Path, to: &Path) -> Result<(), FileError> {
    match fs::try_exists(to).await {
        Ok(true) => return Err(FileError::rename_failed(from, to, "目标文件已存在")),
        Ok(false) => {}
        Err(e) => return Err(FileError::rename_failed(from, to, e.to_string())),
    }
    fs::rename(from, to)
        .await
        .map_err(|e| FileError::rename_failed(from, to, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::event_sink::{event_channel, ConversionEvent};
    use futures::StreamExt;

    #[tokio::test]
    async fn test_renames_encoded_spaces_only_in_basename() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("out%20dir");
        std::fs::create_dir(&dir).unwrap();
        let encoded = dir.join("%20Q1%20report.pdf");
        let plain = dir.join("plain.pdf");
        std::fs::write(&encoded, b"a").unwrap();
        std::fs::write(&plain, b"b").unwrap();

        let (sink, _stream) = event_channel();
        let outcomes = finalize_outputs(&[encoded.clone(), plain.clone()], &sink).await;

        let expected = dir.join(" Q1 report.pdf");
        assert_eq!(
            outcomes,
            vec![
                RenameOutcome::Renamed {
                    from: encoded.clone(),
                    to: expected.clone(),
                },
                RenameOutcome::Unchanged { path: plain },
            ]
        );
        assert!(expected.exists());
        assert!(!encoded.exists());
    }

    #[tokio::test]
    async fn test_second_pass_performs_no_renames() {
        let dir = tempfile::tempdir().unwrap();
        let encoded = dir.path().join("a%20b.pdf");
        std::fs::write(&encoded, b"a").unwrap();
        let (sink, _stream) = event_channel();

        let first = finalize_outputs(&[encoded.clone()], &sink).await;
        let second = finalize_outputs(&[encoded.clone()], &sink).await;

        assert!(matches!(first[0], RenameOutcome::Renamed { .. }));
        assert_eq!(second, vec![RenameOutcome::NotFound { path: encoded }]);
        assert!(dir.path().join("a b.pdf").exists());
    }

    #[tokio::test]
    async fn test_collision_keeps_original_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let encoded = dir.path().join("x%20y.pdf");
        let taken = dir.path().join("x y.pdf");
        let other = dir.path().join("z%20w.pdf");
        std::fs::write(&encoded, b"new").unwrap();
        std::fs::write(&taken, b"old").unwrap();
        std::fs::write(&other, b"other").unwrap();

        let (sink, stream) = event_channel();
        let outcomes = finalize_outputs(&[encoded.clone(), other], &sink).await;
        drop(sink);

        assert!(matches!(outcomes[0], RenameOutcome::Failed { .. }));
        assert!(matches!(outcomes[1], RenameOutcome::Renamed { .. }));
        assert_eq!(std::fs::read(&taken).unwrap(), b"old");
        assert!(encoded.exists());

        let logs: Vec<_> = stream.collect().await;
        assert!(logs.iter().any(|e| matches!(e, ConversionEvent::Log(l) if l.contains("重命名失败"))));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_name_only_loses_encoded_spaces() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let encoded = dir.path().join(OsStr::from_bytes(b"caf\xe9%20menu.pdf"));
        std::fs::write(&encoded, b"a").unwrap();
        let (sink, _stream) = event_channel();

        let outcomes = finalize_outputs(&[encoded.clone()], &sink).await;

        let expected = dir.path().join(OsStr::from_bytes(b"caf\xe9 menu.pdf"));
        assert_eq!(
            outcomes,
            vec![RenameOutcome::Renamed {
                from: encoded,
                to: expected.clone(),
            }]
        );
        assert!(expected.exists());
    }

    #[test]
    fn test_empty_path_list_is_a_no_op() {
        let (sink, _stream) = event_channel();
        let outcomes = tokio_test::block_on(finalize_outputs(&[], &sink));
        assert!(outcomes.is_empty());
    }
}
