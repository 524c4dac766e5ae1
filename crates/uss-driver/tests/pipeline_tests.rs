//! 整条管线的端到端行为测试（模拟设备，无硬件）

use std::time::Duration;
use uss_driver::sim::{SimulatedBinding, SimulatedSensor};
use uss_driver::{AggregatorConfig, FetcherConfig, Uss, UssBuilder};
use uss_protocol::Severity;

const SENSORS: [&str; 5] = ["MB1604_0", "MB1604_1", "MB1604_2", "MB1604_3", "MB1604_4"];

fn fast_fetcher_config() -> FetcherConfig {
    FetcherConfig {
        poll_interval: Duration::from_millis(1),
        diagnostic_interval: Duration::from_millis(20),
    }
}

fn fast_aggregator_config() -> AggregatorConfig {
    AggregatorConfig {
        tick_interval: Duration::from_millis(10),
    }
}

/// 注册 `skip` 之外的所有传感器，构建管线
fn build_pipeline(skip: &[&str]) -> (Uss, Vec<SimulatedSensor>) {
    let mut binding = SimulatedBinding::new();
    let mut sensors = Vec::new();
    for name in SENSORS {
        if !skip.contains(&name) {
            sensors.push(binding.register(name));
        }
    }
    let uss = UssBuilder::new(binding)
        .fetcher_config(fast_fetcher_config())
        .aggregator_config(fast_aggregator_config())
        .build()
        .unwrap();
    (uss, sensors)
}

#[test]
fn telemetry_tracks_latest_sensor_values() {
    let (uss, sensors) = build_pipeline(&[]);
    for (i, sensor) in sensors.iter().enumerate() {
        sensor.set_reading(1000 + i as u32);
    }
    std::thread::sleep(Duration::from_millis(60));

    let mut last = None;
    while let Some(msg) = uss.telemetry().try_pop() {
        last = Some(msg);
    }
    let msg = last.expect("at least one aggregated message");
    assert_eq!(msg.front_left, 1000);
    assert_eq!(msg.front_right, 1001);
    assert_eq!(msg.left, 1002);
    assert_eq!(msg.right, 1003);
    assert_eq!(msg.back, 1004);

    // 正常运行不产生诊断报告
    assert!(uss.diagnostics().is_empty());
    uss.stop();
}

#[test]
fn consumer_observes_successive_values_in_order() {
    let (uss, sensors) = build_pipeline(&[]);
    let front_left = &sensors[0];

    let mut observed = Vec::new();
    for value in [100u32, 105, 110] {
        front_left.set_reading(value);
        std::thread::sleep(Duration::from_millis(40));
        while let Some(msg) = uss.telemetry().try_pop() {
            observed.push(msg.front_left);
        }
    }
    uss.stop();

    for value in [100u32, 105, 110] {
        assert!(observed.contains(&value), "missing {value} in {observed:?}");
    }
    let mut sorted = observed.clone();
    sorted.sort_unstable();
    assert_eq!(observed, sorted, "consumer saw values out of order");
}

#[test]
fn missing_device_escalates_and_reads_sentinel() {
    // 后方设备缺失：uss-back 永久 Faulted
    let (uss, sensors) = build_pipeline(&["MB1604_4"]);
    for sensor in &sensors {
        sensor.set_reading(500);
    }

    // 约 6.5 个诊断周期：报告数在 5..=队列容量 之间（多余的已被逐出）
    std::thread::sleep(Duration::from_millis(130));

    let mut reports = Vec::new();
    while let Some(report) = uss.diagnostics().try_pop() {
        reports.push(report);
    }
    assert!(
        (5..=8).contains(&reports.len()),
        "expected 5..=8 reports, got {}",
        reports.len()
    );
    for report in &reports {
        assert_eq!(report.level, Severity::Error);
        assert_eq!(report.name(), "uss-back");
        assert_eq!(report.message(), "no device");
        assert_eq!(report.id(), "main");
    }

    // back 字段始终是哨兵值，其余字段正常
    let mut last = None;
    while let Some(msg) = uss.telemetry().try_pop() {
        last = Some(msg);
    }
    let msg = last.expect("aggregated message");
    assert_eq!(msg.back, 0);
    assert_eq!(msg.front_left, 500);
    uss.stop();
}

#[test]
fn transient_failure_keeps_stale_value_without_reports() {
    let (uss, sensors) = build_pipeline(&[]);
    let left = &sensors[2];
    left.set_reading(4242);
    std::thread::sleep(Duration::from_millis(40));

    left.set_failing(true);
    std::thread::sleep(Duration::from_millis(60));

    let mut last = None;
    while let Some(msg) = uss.telemetry().try_pop() {
        last = Some(msg);
    }
    assert_eq!(last.expect("aggregated message").left, 4242);
    assert!(uss.diagnostics().is_empty());
    uss.stop();
}

#[test]
fn stop_joins_all_threads_promptly() {
    // 包含一个 faulted fetcher：停机不等完整的诊断周期
    let (uss, _sensors) = build_pipeline(&["MB1604_2"]);
    std::thread::sleep(Duration::from_millis(30));
    let start = std::time::Instant::now();
    uss.stop();
    assert!(start.elapsed() < Duration::from_secs(2));
}
