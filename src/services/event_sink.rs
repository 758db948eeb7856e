//! 事件输出 - 业务能力层
//!
//! 编排器通过 `EventSink` 把日志行、进度和结束状态交给任意展示层，
//! 不直接接触展示层状态。

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::models::CompletionStatus;

/// 编排器产生的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionEvent {
    /// 一行可读日志
    Log(String),
    /// 进度百分比（0-100）
    Progress(u8),
    /// 终止事件，每个任务只有一次
    Completed(CompletionStatus),
}

/// 事件接收方
pub trait EventSink: Send + Sync {
    fn on_log(&self, line: String);
    fn on_progress(&self, percent: u8);
    fn on_complete(&self, status: CompletionStatus);
}

/// 基于异步通道的事件接收方
///
/// 展示层持有 `EventStream` 在自己的任务里消费事件。
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<ConversionEvent>,
}

/// 事件流
pub type EventStream = UnboundedReceiver<ConversionEvent>;

/// 创建一对通道事件接收方 / 事件流
pub fn event_channel() -> (ChannelSink, EventStream) {
    let (tx, rx) = mpsc::unbounded();
    (ChannelSink { tx }, rx)
}

impl ChannelSink {
    fn send(&self, event: ConversionEvent) {
        // 展示层已经退出时丢弃事件
        let _ = self.tx.unbounded_send(event);
    }
}

impl EventSink for ChannelSink {
    fn on_log(&self, line: String) {
        self.send(ConversionEvent::Log(line));
    }

    fn on_progress(&self, percent: u8) {
        self.send(ConversionEvent::Progress(percent));
    }

    fn on_complete(&self, status: CompletionStatus) {
        self.send(ConversionEvent::Completed(status));
    }
}

/// 记录一行日志并同时交给事件接收方
pub fn log_info(sink: &dyn EventSink, line: String) {
    info!("{}", line);
    sink.on_log(line);
}

/// 同 `log_info`，以 warn 级别写入 tracing
pub fn log_warn(sink: &dyn EventSink, line: String) {
    warn!("{}", line);
    sink.on_log(line);
}
