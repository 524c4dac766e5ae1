//! 驱动层错误类型定义
//!
//! 运行中的管线不向上传播任何错误：绑定失败降级为 Faulted 循环，
//! 采样失败静默保留旧值，队满确定性逐出。这里只剩构造期的错误。

use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// Fetcher 通道数不合法（每个 fetcher 拥有 1 或 2 个通道）
    #[error("Fetcher owns {0} channels, expected 1 or 2")]
    InvalidChannelCount(usize),

    /// 操作系统线程创建失败
    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::DriverError;

    #[test]
    fn test_error_display() {
        let err = DriverError::InvalidChannelCount(3);
        assert_eq!(format!("{err}"), "Fetcher owns 3 channels, expected 1 or 2");
    }
}
