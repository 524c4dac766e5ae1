//! 邮箱队列：定容、非阻塞、满时最旧先逐出
//!
//! 子系统里仅有的两条跨线程通道都建立在它之上：
//! - 遥测输出队列（单生产者：aggregator）
//! - 诊断队列（多生产者：所有 faulted fetcher 共享）
//!
//! 设计目标是 **任何一侧都不等待**：生产者推入永不失败，消费者拉取
//! 立即返回。消费过慢不是错误，代价是确定性地丢弃最旧条目。

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// 定容邮箱队列
///
/// 背后是一条 `crossbeam-channel` 有界通道，发送端与接收端成对持有，
/// 克隆后可跨线程分发。`push` 在队满时先弹出最旧条目再重试，
/// 复现固件侧 "put 失败则 purge" 的语义，且不引入互斥锁。
///
/// # Example
///
/// ```
/// use uss_driver::MailboxQueue;
///
/// let queue: MailboxQueue<u32> = MailboxQueue::new(2);
/// queue.push(1);
/// queue.push(2);
/// queue.push(3); // 容量 2，逐出 1
/// assert_eq!(queue.try_pop(), Some(2));
/// assert_eq!(queue.try_pop(), Some(3));
/// assert_eq!(queue.try_pop(), None);
/// ```
pub struct MailboxQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> MailboxQueue<T> {
    /// 创建容量为 `capacity` 的队列
    ///
    /// # Panics
    ///
    /// `capacity` 为 0 时 panic（零容量是会合通道，违背非阻塞设计）。
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "mailbox capacity must be non-zero");
        let (tx, rx) = bounded(capacity);
        Self { tx, rx }
    }

    /// 推入一个条目，永不阻塞、永不失败
    ///
    /// 队满时逐出最旧条目直到有空位。多个生产者并发推入时，
    /// 逐出与重试在循环内竞争收敛，每个生产者都在有限步内完成。
    pub fn push(&self, item: T) {
        let mut item = item;
        loop {
            match self.tx.try_send(item) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    // 最旧先逐出；弹出失败说明别的生产者已腾出空位
                    let _ = self.rx.try_recv();
                    item = rejected;
                },
                // 本实例自持接收端，通道不可能断开
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    /// 非阻塞取出最旧条目，空则返回 `None`
    pub fn try_pop(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// 当前条目数（并发场景下仅作参考）
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// 队列是否为空
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// 队列容量
    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(0)
    }
}

impl<T> Clone for MailboxQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}
