//! 子系统编译期常量
//!
//! 所有周期与容量都是编译期固定值：修改任何一项都意味着重新构建固件，
//! 不存在运行时调参入口。

use std::time::Duration;

/// Fetcher 正常轮询周期
///
/// 每个 fetcher 线程以此周期采样其全部通道。缩短它提高缓存新鲜度，
/// 代价是传感器总线占用率上升。
pub const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Aggregator 汇聚周期
///
/// 每个 tick 产出一条 [`RangeMessage`](crate::RangeMessage)。
/// 下游发布者的消费速率应不低于 `1 / AGGREGATE_INTERVAL`，
/// 否则输出队列按最旧先逐出的方式丢弃。
pub const AGGREGATE_INTERVAL: Duration = Duration::from_millis(100);

/// Faulted fetcher 的诊断重报周期
///
/// 绑定失败的 fetcher 以此周期向诊断队列重复推送 ERROR 报告，永不停止。
pub const DIAGNOSTIC_INTERVAL: Duration = Duration::from_secs(5);

/// 两个邮箱队列（遥测输出 / 诊断上报）的共用容量
pub const MAILBOX_CAPACITY: usize = 8;

/// "从未采样成功" 的哨兵值（毫米）
///
/// 注意：与真实的 0mm 读数无法区分。这是对既有固件行为的保留，
/// 消费端契约依赖它，详见 DESIGN.md 的开放问题记录。
pub const NO_READING_MM: u32 = 0;

/// Faulted fetcher 诊断报告的固定消息文本
pub const NO_DEVICE_MESSAGE: &str = "no device";
