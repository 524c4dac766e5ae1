//! 聚合测距消息定义

/// 一个 aggregator tick 产出的复合测距记录
///
/// 单位统一为毫米。字段顺序（front_left → back）是对外稳定契约，
/// 外部遥测发布者按此顺序逐字段拷贝。
///
/// # 设计特性
///
/// - **Copy trait**：20 字节定长，零成本复制，适合每 tick 一条的高频场景
/// - **无时间戳**：新鲜度由 "最后写入获胜" 隐含，消费者只关心最新值
///
/// # Example
///
/// ```
/// use uss_protocol::RangeMessage;
///
/// let msg = RangeMessage::default();
/// assert_eq!(msg.front_left, 0);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeMessage {
    /// 前方左侧距离（mm）
    pub front_left: u32,
    /// 前方右侧距离（mm）
    pub front_right: u32,
    /// 左侧距离（mm）
    pub left: u32,
    /// 右侧距离（mm）
    pub right: u32,
    /// 后方距离（mm）
    pub back: u32,
}
