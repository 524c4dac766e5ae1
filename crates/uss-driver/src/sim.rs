//! 模拟设备（无硬件测试后端）
//!
//! 模拟传感器是一个共享 "寄存器"：测试或演示程序通过
//! [`SimulatedSensor`] 句柄随时改写读数或注入瞬时故障，
//! 绑定出的 [`RangeDevice`] 在每次采样时读取它。

use crate::device::{DeviceBinding, RangeDevice};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// 模拟传感器的控制句柄
///
/// 可克隆；所有克隆与绑定出的设备共享同一寄存器。
#[derive(Clone, Default)]
pub struct SimulatedSensor {
    reading: Arc<AtomicU32>,
    failing: Arc<AtomicBool>,
}

impl SimulatedSensor {
    /// 设置当前读数（mm）
    pub fn set_reading(&self, mm: u32) {
        self.reading.store(mm, Ordering::Relaxed);
    }

    /// 注入/解除瞬时采样故障
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

/// 按名字查找模拟传感器的绑定实现
///
/// 未注册的名字绑定失败，用于模拟缺失的硬件。
///
/// # Example
///
/// ```
/// use uss_driver::DeviceBinding;
/// use uss_driver::sim::SimulatedBinding;
///
/// let mut binding = SimulatedBinding::new();
/// let sensor = binding.register("MB1604_0");
/// sensor.set_reading(250);
/// assert!(binding.bind("MB1604_0").is_some());
/// assert!(binding.bind("MB1604_9").is_none());
/// ```
#[derive(Default)]
pub struct SimulatedBinding {
    sensors: HashMap<String, SimulatedSensor>,
}

impl SimulatedBinding {
    /// 创建空的绑定表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个名字，返回其控制句柄
    pub fn register(&mut self, name: &str) -> SimulatedSensor {
        let sensor = SimulatedSensor::default();
        self.sensors.insert(name.to_string(), sensor.clone());
        sensor
    }
}

impl DeviceBinding for SimulatedBinding {
    fn bind(&self, name: &str) -> Option<Box<dyn RangeDevice>> {
        self.sensors
            .get(name)
            .map(|sensor| Box::new(SimulatedDevice(sensor.clone())) as Box<dyn RangeDevice>)
    }
}

/// 绑定出的模拟设备
struct SimulatedDevice(SimulatedSensor);

impl RangeDevice for SimulatedDevice {
    fn sample(&mut self) -> Option<u32> {
        if self.0.failing.load(Ordering::Relaxed) {
            None
        } else {
            Some(self.0.reading.load(Ordering::Relaxed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SimulatedBinding;
    use crate::device::DeviceBinding;

    #[test]
    fn test_bind_and_sample() {
        let mut binding = SimulatedBinding::new();
        let sensor = binding.register("S0");
        sensor.set_reading(777);
        let mut device = binding.bind("S0").unwrap();
        assert_eq!(device.sample(), Some(777));
        sensor.set_failing(true);
        assert_eq!(device.sample(), None);
    }

    #[test]
    fn test_unknown_name_unbound() {
        let binding = SimulatedBinding::new();
        assert!(binding.bind("nope").is_none());
    }
}
