//! 源文件权限调整 - 业务能力层
//!
//! 部分文件系统上的源文件是只读的，自动化层打开时会报权限错误。
//! 这里只做尽力而为的调整，失败由调用方记录后忽略。

use std::io;
use std::path::Path;

use tokio::fs;

/// 如果文件是只读的，为当前用户加上写权限
///
/// 返回是否修改了权限。
pub async fn ensure_writable(path: &Path) -> io::Result<bool> {
    let metadata = fs::metadata(path).await?;
    let mut permissions = metadata.permissions();
    if !permissions.readonly() {
        return Ok(false);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    {
        permissions.set_readonly(false);
    }

    fs::set_permissions(path, permissions).await?;
    Ok(true)
}
