//! 进度跟踪
//!
//! 百分比 = 已处理文件数 * 100 / 文件总数（向下取整）。
//! 中途最多到 99，100 只在任务结束时强制给出，且从不回退。

/// 进度跟踪器
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    processed: usize,
    last: u8,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            last: 0,
        }
    }

    /// 记录处理完一个文件，返回新的百分比
    pub fn advance(&mut self) -> u8 {
        self.processed = (self.processed + 1).min(self.total);
        let computed = if self.total == 0 {
            0
        } else {
            (self.processed * 100 / self.total).min(99) as u8
        };
        self.last = self.last.max(computed);
        self.last
    }

    /// 任务结束，强制 100
    pub fn complete(&mut self) -> u8 {
        self.last = 100;
        self.last
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn percent(&self) -> u8 {
        self.last
    }
}
