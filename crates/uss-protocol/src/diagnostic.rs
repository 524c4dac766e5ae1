//! 诊断报告结构体定义
//!
//! 固定长度字段布局由外部诊断发布者按原始偏移消费，
//! 构造时截断并以 NUL 结尾，读取时只取 NUL 之前的前缀。

use crate::ProtocolError;

/// 诊断严重级别
///
/// 数值与下游诊断协议一致，不可重排。
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// 正常
    Ok = 0,
    /// 警告
    Warn = 1,
    /// 错误
    Error = 2,
    /// 数据过期
    Stale = 3,
}

impl TryFrom<i8> for Severity {
    type Error = ProtocolError;

    fn try_from(value: i8) -> Result<Self, ProtocolError> {
        match value {
            0 => Ok(Severity::Ok),
            1 => Ok(Severity::Warn),
            2 => Ok(Severity::Error),
            3 => Ok(Severity::Stale),
            _ => Err(ProtocolError::InvalidValue {
                field: "Severity",
                value,
            }),
        }
    }
}

/// 固定格式故障报告
///
/// 来源 id 与消息文本为定长字段，超长部分在构造时截断。
/// 所有 fetcher 共享一个诊断队列，溢出时最旧的报告被静默丢弃，
/// 故障历史是尽力而为而非可靠投递。
///
/// # Example
///
/// ```
/// use uss_protocol::{DiagnosticReport, Severity};
///
/// let report = DiagnosticReport::new(Severity::Error, "uss-front", "no device");
/// assert_eq!(report.level, Severity::Error);
/// assert_eq!(report.name(), "uss-front");
/// assert_eq!(report.message(), "no device");
/// assert_eq!(report.id(), "main");
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticReport {
    /// 报告来源名（NUL 结尾，定长 24 字节）
    pub name: [u8; Self::NAME_LEN],
    /// 自由文本消息（NUL 结尾，定长 64 字节）
    pub message: [u8; Self::MESSAGE_LEN],
    /// 硬件 id（NUL 结尾，定长 8 字节，固定 "main"）
    pub id: [u8; Self::ID_LEN],
    /// 严重级别
    pub level: Severity,
}

impl DiagnosticReport {
    /// 来源名字段长度（含 NUL）
    pub const NAME_LEN: usize = 24;
    /// 消息字段长度（含 NUL）
    pub const MESSAGE_LEN: usize = 64;
    /// 硬件 id 字段长度（含 NUL）
    pub const ID_LEN: usize = 8;

    /// 构造新报告，超长字段截断到定长并保留 NUL 结尾
    pub fn new(level: Severity, name: &str, message: &str) -> Self {
        let mut report = Self {
            name: [0; Self::NAME_LEN],
            message: [0; Self::MESSAGE_LEN],
            id: [0; Self::ID_LEN],
            level,
        };
        fill_field(&mut report.name, name);
        fill_field(&mut report.message, message);
        fill_field(&mut report.id, "main");
        report
    }

    /// 来源名（NUL 之前的前缀）
    pub fn name(&self) -> &str {
        field_str(&self.name)
    }

    /// 消息文本（NUL 之前的前缀）
    pub fn message(&self) -> &str {
        field_str(&self.message)
    }

    /// 硬件 id（NUL 之前的前缀）
    pub fn id(&self) -> &str {
        field_str(&self.id)
    }
}

impl Default for DiagnosticReport {
    fn default() -> Self {
        Self::new(Severity::Ok, "", "")
    }
}

/// 把 `src` 拷入定长字段，必要时在字符边界上截断，末尾保证一个 NUL
fn fill_field(dst: &mut [u8], src: &str) {
    let mut len = src.len().min(dst.len() - 1);
    while len > 0 && !src.is_char_boundary(len) {
        len -= 1;
    }
    dst[..len].copy_from_slice(&src.as_bytes()[..len]);
}

/// 取字段的 NUL 前缀；字段由 [`fill_field`] 写入，必然是合法 UTF-8
fn field_str(buf: &[u8]) -> &str {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_values() {
        assert_eq!(Severity::Ok as i8, 0);
        assert_eq!(Severity::Warn as i8, 1);
        assert_eq!(Severity::Error as i8, 2);
        assert_eq!(Severity::Stale as i8, 3);
    }

    #[test]
    fn test_severity_try_from() {
        assert_eq!(Severity::try_from(2), Ok(Severity::Error));
        assert_eq!(
            Severity::try_from(4),
            Err(ProtocolError::InvalidValue {
                field: "Severity",
                value: 4,
            })
        );
        assert_eq!(
            Severity::try_from(-1),
            Err(ProtocolError::InvalidValue {
                field: "Severity",
                value: -1,
            })
        );
    }

    #[test]
    fn test_report_roundtrip() {
        let report = DiagnosticReport::new(Severity::Error, "uss-back", "no device");
        assert_eq!(report.level, Severity::Error);
        assert_eq!(report.name(), "uss-back");
        assert_eq!(report.message(), "no device");
        assert_eq!(report.id(), "main");
    }

    #[test]
    fn test_report_default() {
        let report = DiagnosticReport::default();
        assert_eq!(report.level, Severity::Ok);
        assert_eq!(report.name(), "");
        assert_eq!(report.message(), "");
        assert_eq!(report.id(), "main");
    }

    #[test]
    fn test_report_truncates_long_fields() {
        let long = "x".repeat(200);
        let report = DiagnosticReport::new(Severity::Warn, &long, &long);
        // 定长字段保留一个 NUL 结尾
        assert_eq!(report.name().len(), DiagnosticReport::NAME_LEN - 1);
        assert_eq!(report.message().len(), DiagnosticReport::MESSAGE_LEN - 1);
    }

    #[test]
    fn test_report_truncation_respects_char_boundary() {
        // 23 字节恰好落在多字节字符中间，截断必须回退到字符边界
        let name = "传感器组前方左侧超声波"; // 3 bytes per char
        let report = DiagnosticReport::new(Severity::Ok, name, "");
        assert!(report.name().len() <= DiagnosticReport::NAME_LEN - 1);
        assert!(name.starts_with(report.name()));
    }
}
