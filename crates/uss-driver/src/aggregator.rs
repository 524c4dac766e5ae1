//! Aggregator：扇入汇聚循环
//!
//! 以固定周期读取每个 fetcher 的最新缓存值，按固定字段顺序组装一条
//! [`RangeMessage`]，推入遥测输出队列。整个 tick 有界完成：读缓存是
//! 原子加载，入队靠队列自身的逐出策略，无任何重试或等待。

use crate::fetcher::FetcherReader;
use crate::mailbox::MailboxQueue;
use crate::ticker::Ticker;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::trace;
use uss_protocol::{AGGREGATE_INTERVAL, RangeMessage};

/// Aggregator 周期配置
///
/// 与 [`FetcherConfig`](crate::FetcherConfig) 同理：出厂节奏是编译期
/// 常量，结构体只为测试提供短周期。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// 汇聚 tick 周期
    pub tick_interval: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: AGGREGATE_INTERVAL,
        }
    }
}

/// 固定顺序的 fetcher 读端集合
///
/// front 拥有两个通道（FL/FR），其余各一个。顺序即
/// [`RangeMessage`] 的字段顺序，不可重排。
#[derive(Clone)]
pub struct RangeReaders {
    pub front: FetcherReader,
    pub left: FetcherReader,
    pub right: FetcherReader,
    pub back: FetcherReader,
}

/// 执行一个汇聚 tick：按固定顺序拷贝各 fetcher 的最新值
pub fn aggregate_once(readers: &RangeReaders) -> RangeMessage {
    let front = readers.front.get_latest();
    RangeMessage {
        front_left: front[0],
        front_right: front[1],
        left: readers.left.get_latest()[0],
        right: readers.right.get_latest()[0],
        back: readers.back.get_latest()[0],
    }
}

/// 启动 aggregator 线程
///
/// 每个 tick 产出一条消息推入 `telemetry`；消费过慢时队列按最旧先
/// 逐出丢弃，循环自身永不阻塞。`running` 清零后线程退出
/// （追加的停机保证，原固件循环无条件无限）。
pub fn spawn_aggregator(
    readers: RangeReaders,
    telemetry: MailboxQueue<RangeMessage>,
    running: Arc<AtomicBool>,
    config: AggregatorConfig,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("uss-aggregator".into())
        .spawn(move || aggregate_loop(readers, telemetry, running, config))
}

fn aggregate_loop(
    readers: RangeReaders,
    telemetry: MailboxQueue<RangeMessage>,
    running: Arc<AtomicBool>,
    config: AggregatorConfig,
) {
    let ticker = Ticker::new(config.tick_interval);
    while running.load(Ordering::Relaxed) {
        let message = aggregate_once(&readers);
        trace!(?message, "aggregated tick");
        telemetry.push(message);
        ticker.wait();
    }
}
