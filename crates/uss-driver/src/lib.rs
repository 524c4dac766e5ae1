//! 超声波测距子系统驱动层
//!
//! 本模块提供多源传感器采集与汇聚管线，包括：
//! - Fetcher 线程管理（每个 fetcher 独占 1~2 个通道）
//! - 无锁最新值缓存（每通道一个原子槽位，最后写入获胜）
//! - 邮箱队列（定容、非阻塞、满时最旧先逐出，遥测与诊断复用）
//! - 故障隔离（绑定失败的 fetcher 永久降级为周期性诊断上报）
//!
//! # 数据流
//!
//! ```text
//! Channel → Fetcher(缓存) → Aggregator(扇入) → MailboxQueue → 外部发布者
//!                ↓ 绑定失败
//!          诊断 MailboxQueue → 外部诊断发布者
//! ```
//!
//! # 并发模型
//!
//! 每个 fetcher 一个线程，aggregator 一个线程；循环之间唯一的阻塞点是
//! 固定周期的 ticker 睡眠。每个通道的缓存槽只有其所属 fetcher 线程写入，
//! aggregator 只读；读写竞争是良性的（整值原子写入，绝不撕裂）。

mod aggregator;
mod builder;
mod channel;
pub mod device;
mod error;
mod fetcher;
mod mailbox;
#[cfg(any(test, feature = "mock"))]
pub mod sim;
mod ticker;

pub use aggregator::{AggregatorConfig, RangeReaders, aggregate_once, spawn_aggregator};
pub use builder::{Uss, UssBuilder};
pub use channel::Channel;
pub use device::{DeviceBinding, RangeDevice};
pub use error::DriverError;
pub use fetcher::{Fetcher, FetcherConfig, FetcherHandle, FetcherReader, FetcherState};
pub use mailbox::MailboxQueue;
pub use ticker::Ticker;
