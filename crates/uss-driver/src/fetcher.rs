//! Fetcher：独占通道的持续轮询单元
//!
//! 每个 fetcher 拥有 1~2 个通道，在自己的线程里以固定周期连续采样。
//! 生命周期状态机：
//!
//! ```text
//! Unbound ──全部绑定成功──► Bound    （正常轮询循环，无限期）
//!    └────任一绑定失败────► Faulted  （诊断上报循环，终态）
//! ```
//!
//! Faulted 是终态：进程内不存在恢复路径，fetcher 永不采样，
//! 只按诊断周期向共享诊断队列重复推送 ERROR 报告。

use crate::channel::Channel;
use crate::device::DeviceBinding;
use crate::error::DriverError;
use crate::mailbox::MailboxQueue;
use crate::ticker::Ticker;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};
use uss_protocol::{
    DIAGNOSTIC_INTERVAL, DiagnosticReport, NO_DEVICE_MESSAGE, NO_READING_MM, POLL_INTERVAL,
    Severity,
};

/// Fetcher 周期配置
///
/// 出厂节奏就是 [`uss_protocol::constants`] 里的编译期常量；
/// 本结构体的存在只是为了让测试能以短周期驱动同一套循环。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Bound 状态的采样周期
    pub poll_interval: Duration,
    /// Faulted 状态的诊断重报周期
    pub diagnostic_interval: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            diagnostic_interval: DIAGNOSTIC_INTERVAL,
        }
    }
}

/// Fetcher 生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherState {
    /// 全部通道绑定成功，运行正常轮询循环
    Bound,
    /// 存在绑定失败的通道，终态，只运行诊断循环
    Faulted,
}

/// 线程独占的采样单元
pub struct Fetcher {
    id: String,
    channels: Vec<Channel>,
    latest: [Arc<AtomicU32>; 2],
    state: FetcherState,
}

impl Fetcher {
    /// 绑定 1~2 个设备，构造 fetcher
    ///
    /// 绑定只尝试一次，结果永久有效。任一设备缺失则整组进入
    /// [`FetcherState::Faulted`]，缓存槽永远停留在哨兵值
    /// [`NO_READING_MM`]。
    ///
    /// # Errors
    ///
    /// 通道数不在 1..=2 时返回 [`DriverError::InvalidChannelCount`]。
    pub fn bind(
        id: impl Into<String>,
        names: &[&str],
        binding: &dyn DeviceBinding,
    ) -> Result<Self, DriverError> {
        if names.is_empty() || names.len() > 2 {
            return Err(DriverError::InvalidChannelCount(names.len()));
        }
        let id = id.into();

        let mut channels = Vec::with_capacity(names.len());
        let mut faulted = false;
        for name in names {
            match binding.bind(name) {
                Some(device) => channels.push(Channel::new(device)),
                None => {
                    warn!(fetcher = %id, device = %name, "device binding failed");
                    faulted = true;
                },
            }
        }
        if faulted {
            return Ok(Self {
                id,
                channels: Vec::new(),
                latest: sentinel_slots(),
                state: FetcherState::Faulted,
            });
        }

        let latest = [
            channels[0].reader(),
            channels
                .get(1)
                .map(Channel::reader)
                .unwrap_or_else(|| Arc::new(AtomicU32::new(NO_READING_MM))),
        ];
        debug!(fetcher = %id, channels = channels.len(), "fetcher bound");
        Ok(Self {
            id,
            channels,
            latest,
            state: FetcherState::Bound,
        })
    }

    /// Fetcher id（诊断报告的来源名）
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 当前生命周期状态
    pub fn state(&self) -> FetcherState {
        self.state
    }

    /// 缓存槽的只读句柄
    pub fn reader(&self) -> FetcherReader {
        FetcherReader {
            latest: [Arc::clone(&self.latest[0]), Arc::clone(&self.latest[1])],
        }
    }

    /// 启动专属线程，fetcher 的所有权移入线程
    ///
    /// Bound 走正常轮询循环，Faulted 走诊断循环；两者都在每次迭代
    /// 检查 `running` 标志（原固件无停机路径，此检查是本实现追加的
    /// 保证，供宿主进程与测试回收线程）。
    pub fn spawn(
        self,
        diagnostics: MailboxQueue<DiagnosticReport>,
        running: Arc<AtomicBool>,
        config: FetcherConfig,
    ) -> Result<FetcherHandle, DriverError> {
        let id = self.id.clone();
        let reader = self.reader();
        let thread = thread::Builder::new()
            .name(format!("uss-fetcher-{id}"))
            .spawn(move || self.run(diagnostics, running, config))?;
        Ok(FetcherHandle { id, reader, thread })
    }

    fn run(
        mut self,
        diagnostics: MailboxQueue<DiagnosticReport>,
        running: Arc<AtomicBool>,
        config: FetcherConfig,
    ) {
        match self.state {
            FetcherState::Bound => self.run_bound(&running, config.poll_interval),
            FetcherState::Faulted => {
                self.run_faulted(&diagnostics, &running, config.diagnostic_interval)
            },
        }
    }

    /// 正常循环：每周期采样所有通道，成功即覆盖缓存，失败静默
    fn run_bound(&mut self, running: &AtomicBool, interval: Duration) {
        let ticker = Ticker::new(interval);
        while running.load(Ordering::Relaxed) {
            for channel in &mut self.channels {
                channel.poll();
            }
            ticker.wait();
        }
    }

    /// 诊断循环：永不采样，按周期重复推送同一条 ERROR 报告
    fn run_faulted(
        &self,
        diagnostics: &MailboxQueue<DiagnosticReport>,
        running: &AtomicBool,
        interval: Duration,
    ) {
        let ticker = Ticker::new(interval);
        let report = DiagnosticReport::new(Severity::Error, &self.id, NO_DEVICE_MESSAGE);
        while running.load(Ordering::Relaxed) {
            diagnostics.push(report);
            ticker.wait_while(running);
        }
    }
}

/// 缓存槽的廉价只读句柄，可克隆、可跨线程
///
/// `get_latest` 立即返回，绝不阻塞。从未采样成功的槽位（包括
/// Faulted fetcher 的全部槽位和单通道 fetcher 的第二槽位）读到
/// 哨兵值 0——调用方无法区分 "无数据" 与真实的 0mm 读数，
/// 这是对既有固件契约的保留。
#[derive(Clone)]
pub struct FetcherReader {
    pub(crate) latest: [Arc<AtomicU32>; 2],
}

impl FetcherReader {
    /// 读取两个槽位的最新缓存值（mm）
    pub fn get_latest(&self) -> [u32; 2] {
        [
            self.latest[0].load(Ordering::Relaxed),
            self.latest[1].load(Ordering::Relaxed),
        ]
    }
}

/// 已启动 fetcher 的宿主侧句柄
pub struct FetcherHandle {
    id: String,
    reader: FetcherReader,
    thread: JoinHandle<()>,
}

impl FetcherHandle {
    /// Fetcher id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 缓存只读句柄
    pub fn reader(&self) -> FetcherReader {
        self.reader.clone()
    }

    /// 读取两个槽位的最新缓存值（mm）
    pub fn get_latest(&self) -> [u32; 2] {
        self.reader.get_latest()
    }

    /// 等待线程退出（仅在 `running` 置为 false 后有意义）
    pub fn join(self) {
        let _ = self.thread.join();
    }
}

pub(crate) fn sentinel_slots() -> [Arc<AtomicU32>; 2] {
    [
        Arc::new(AtomicU32::new(NO_READING_MM)),
        Arc::new(AtomicU32::new(NO_READING_MM)),
    ]
}
