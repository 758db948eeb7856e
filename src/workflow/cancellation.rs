//! 取消标志
//!
//! 展示层与后台任务之间唯一共享的可变状态。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 协作式取消标志
///
/// 克隆后共享同一个标志。编排器只在开始新文件和每次尝试前检查，
/// 正在进行的引擎调用不会被打断。
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    inner: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消，可在任意线程调用
    pub fn request_cancel(&self) {
        self.inner.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = CancellationFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());
        handle.request_cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let flag = CancellationFlag::new();
        let handle = flag.clone();
        std::thread::spawn(move || handle.request_cancel())
            .join()
            .unwrap();
        assert!(flag.is_cancelled());
    }
}
