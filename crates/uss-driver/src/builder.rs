//! Builder 模式实现
//!
//! 链式构造整条采集管线：四个 fetcher 线程（front 双通道，
//! left/right/back 各单通道）+ 一个 aggregator 线程 + 两条邮箱队列。
//! 所有实例都是显式构造、通过参数传递的——没有任何全局可变状态。

use crate::aggregator::{AggregatorConfig, RangeReaders, spawn_aggregator};
use crate::device::DeviceBinding;
use crate::error::DriverError;
use crate::fetcher::{Fetcher, FetcherConfig, FetcherHandle};
use crate::mailbox::MailboxQueue;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tracing::info;
use uss_protocol::{DiagnosticReport, MAILBOX_CAPACITY, RangeMessage};

/// USS 管线 Builder（链式构造）
///
/// 默认设备名沿用整机布线：`MB1604_0`/`MB1604_1` 为前方左右，
/// `MB1604_2`~`MB1604_4` 为左/右/后。
///
/// # Example
///
/// ```no_run
/// use uss_driver::UssBuilder;
/// use uss_driver::sim::SimulatedBinding;
///
/// let mut binding = SimulatedBinding::new();
/// for name in ["MB1604_0", "MB1604_1", "MB1604_2", "MB1604_3", "MB1604_4"] {
///     binding.register(name);
/// }
/// let uss = UssBuilder::new(binding).build().unwrap();
/// if let Some(msg) = uss.telemetry().try_pop() {
///     println!("front-left: {}mm", msg.front_left);
/// }
/// ```
pub struct UssBuilder<B: DeviceBinding> {
    binding: B,
    front: (String, String),
    left: String,
    right: String,
    back: String,
    fetcher_config: FetcherConfig,
    aggregator_config: AggregatorConfig,
}

impl<B: DeviceBinding> UssBuilder<B> {
    /// 以默认设备名创建 Builder
    pub fn new(binding: B) -> Self {
        Self {
            binding,
            front: ("MB1604_0".into(), "MB1604_1".into()),
            left: "MB1604_2".into(),
            right: "MB1604_3".into(),
            back: "MB1604_4".into(),
            fetcher_config: FetcherConfig::default(),
            aggregator_config: AggregatorConfig::default(),
        }
    }

    /// 覆盖前方两个设备名（FL, FR）
    pub fn front(mut self, fl: &str, fr: &str) -> Self {
        self.front = (fl.into(), fr.into());
        self
    }

    /// 覆盖左侧设备名
    pub fn left(mut self, name: &str) -> Self {
        self.left = name.into();
        self
    }

    /// 覆盖右侧设备名
    pub fn right(mut self, name: &str) -> Self {
        self.right = name.into();
        self
    }

    /// 覆盖后方设备名
    pub fn back(mut self, name: &str) -> Self {
        self.back = name.into();
        self
    }

    /// 覆盖 fetcher 周期（测试用；出厂节奏是编译期常量）
    pub fn fetcher_config(mut self, config: FetcherConfig) -> Self {
        self.fetcher_config = config;
        self
    }

    /// 覆盖 aggregator 周期（测试用；出厂节奏是编译期常量）
    pub fn aggregator_config(mut self, config: AggregatorConfig) -> Self {
        self.aggregator_config = config;
        self
    }

    /// 绑定全部设备并启动所有线程
    ///
    /// 绑定失败不会使构造失败：对应 fetcher 以 Faulted 状态启动，
    /// 进入诊断上报循环。唯一的失败路径是线程创建本身。
    pub fn build(self) -> Result<Uss, DriverError> {
        let running = Arc::new(AtomicBool::new(true));
        let telemetry = MailboxQueue::new(MAILBOX_CAPACITY);
        let diagnostics = MailboxQueue::new(MAILBOX_CAPACITY);

        let groups: [(&str, Vec<&str>); 4] = [
            ("uss-front", vec![self.front.0.as_str(), self.front.1.as_str()]),
            ("uss-left", vec![self.left.as_str()]),
            ("uss-right", vec![self.right.as_str()]),
            ("uss-back", vec![self.back.as_str()]),
        ];

        let mut fetchers = Vec::with_capacity(groups.len());
        for (id, names) in groups {
            let fetcher = Fetcher::bind(id, &names, &self.binding)?;
            let handle =
                fetcher.spawn(diagnostics.clone(), running.clone(), self.fetcher_config)?;
            fetchers.push(handle);
        }

        // 固定扇入顺序：front(FL,FR) → left → right → back
        let readers = RangeReaders {
            front: fetchers[0].reader(),
            left: fetchers[1].reader(),
            right: fetchers[2].reader(),
            back: fetchers[3].reader(),
        };
        let aggregator = spawn_aggregator(
            readers,
            telemetry.clone(),
            running.clone(),
            self.aggregator_config,
        )?;

        info!(fetchers = fetchers.len(), "uss pipeline started");
        Ok(Uss {
            telemetry,
            diagnostics,
            fetchers,
            aggregator,
            running,
        })
    }
}

/// 运行中的采集管线
///
/// 持有全部线程句柄与两条队列的宿主侧端点。固件形态下它在进程
/// 启动时构造一次、存活到复位；[`stop`](Uss::stop) 是本实现追加的
/// 停机保证，供宿主进程与测试回收线程。
pub struct Uss {
    telemetry: MailboxQueue<RangeMessage>,
    diagnostics: MailboxQueue<DiagnosticReport>,
    fetchers: Vec<FetcherHandle>,
    aggregator: JoinHandle<()>,
    running: Arc<AtomicBool>,
}

impl Uss {
    /// 遥测输出队列（每个 aggregator tick 一条 [`RangeMessage`]）
    pub fn telemetry(&self) -> &MailboxQueue<RangeMessage> {
        &self.telemetry
    }

    /// 共享诊断队列（faulted fetcher 的 ERROR 报告）
    pub fn diagnostics(&self) -> &MailboxQueue<DiagnosticReport> {
        &self.diagnostics
    }

    /// 全部 fetcher 句柄，按固定扇入顺序
    pub fn fetchers(&self) -> &[FetcherHandle] {
        &self.fetchers
    }

    /// 置停机标志并等待所有线程退出
    pub fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        for fetcher in self.fetchers {
            fetcher.join();
        }
        let _ = self.aggregator.join();
        info!("uss pipeline stopped");
    }
}
