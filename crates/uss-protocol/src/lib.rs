//! # USS Protocol
//!
//! 超声波测距子系统的消息布局定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `constants`: 轮询周期、队列容量等编译期常量
//! - `diagnostic`: 诊断报告（固定长度字段，发布端按原始布局消费）
//! - `message`: 聚合测距消息
//!
//! ## 字段顺序
//!
//! [`RangeMessage`] 和 [`DiagnosticReport`] 均为 `#[repr(C)]`，字段顺序
//! 是对外稳定契约的一部分：外部发布者按固定偏移读取，不做任何协商。

pub mod constants;
pub mod diagnostic;
pub mod message;

// 重新导出常用类型
pub use constants::*;
pub use diagnostic::{DiagnosticReport, Severity};
pub use message::RangeMessage;

use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// 字段取值不在合法范围内
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: i8 },
}
