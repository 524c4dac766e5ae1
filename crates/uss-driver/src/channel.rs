//! 通道：单个已绑定设备 + 最新读数缓存

use crate::device::RangeDevice;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use uss_protocol::NO_READING_MM;

/// 单个硬件传感器绑定及其最新成功读数
///
/// 所有权规则：一个通道在整个生命周期内只属于一个 fetcher，缓存槽
/// 只由该 fetcher 线程写入；aggregator 侧仅持有 [`Arc<AtomicU32>`]
/// 读端。读与写的竞争是良性的：u32 整值原子存取，读到的要么是
/// 写入前的值要么是写入后的值，绝不会撕裂。
pub struct Channel {
    device: Box<dyn RangeDevice>,
    latest: Arc<AtomicU32>,
}

impl Channel {
    /// 包装一个已绑定设备，缓存初始化为哨兵值
    pub fn new(device: Box<dyn RangeDevice>) -> Self {
        Self {
            device,
            latest: Arc::new(AtomicU32::new(NO_READING_MM)),
        }
    }

    /// 采样一次；成功则覆盖缓存（最后写入获胜），失败则静默保留旧值
    pub fn poll(&mut self) {
        if let Some(mm) = self.device.sample() {
            self.latest.store(mm, Ordering::Relaxed);
        }
    }

    /// 缓存槽的只读端，供 aggregator 持有
    pub fn reader(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.latest)
    }
}

#[cfg(test)]
mod tests {
    use super::Channel;
    use crate::device::RangeDevice;
    use std::sync::atomic::Ordering;

    /// 按脚本依次产出读数的测试设备
    struct Scripted {
        samples: Vec<Option<u32>>,
        cursor: usize,
    }

    impl RangeDevice for Scripted {
        fn sample(&mut self) -> Option<u32> {
            let value = self.samples.get(self.cursor).copied().flatten();
            self.cursor += 1;
            value
        }
    }

    #[test]
    fn test_successful_sample_overwrites_cache() {
        let mut channel = Channel::new(Box::new(Scripted {
            samples: vec![Some(120), Some(250)],
            cursor: 0,
        }));
        let reader = channel.reader();
        assert_eq!(reader.load(Ordering::Relaxed), 0);
        channel.poll();
        assert_eq!(reader.load(Ordering::Relaxed), 120);
        channel.poll();
        assert_eq!(reader.load(Ordering::Relaxed), 250);
    }

    #[test]
    fn test_transient_failure_retains_stale_value() {
        let mut channel = Channel::new(Box::new(Scripted {
            samples: vec![Some(300), None, Some(310)],
            cursor: 0,
        }));
        let reader = channel.reader();
        channel.poll();
        assert_eq!(reader.load(Ordering::Relaxed), 300);
        channel.poll(); // 读取失败：缓存不变
        assert_eq!(reader.load(Ordering::Relaxed), 300);
        channel.poll();
        assert_eq!(reader.load(Ordering::Relaxed), 310);
    }

    #[test]
    fn test_never_sampled_reads_sentinel() {
        let channel = Channel::new(Box::new(Scripted {
            samples: vec![],
            cursor: 0,
        }));
        assert_eq!(channel.reader().load(Ordering::Relaxed), 0);
    }
}
