//! # USS CLI
//!
//! 以模拟传感器驱动完整采集管线的演示程序：四个 fetcher 线程 +
//! aggregator 线程 + 两条邮箱队列，本进程扮演外部发布者，把遥测
//! 与诊断队列里的内容打到日志上。
//!
//! ```bash
//! # 五个传感器全部在线，Ctrl-C 退出
//! uss-cli
//!
//! # 模拟后方设备缺失，观察诊断上报，3 秒后自动退出
//! uss-cli --missing MB1604_4 --duration 3
//! ```

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uss_driver::UssBuilder;
use uss_driver::sim::{SimulatedBinding, SimulatedSensor};

const SENSORS: [&str; 5] = ["MB1604_0", "MB1604_1", "MB1604_2", "MB1604_3", "MB1604_4"];

/// USS demo - simulated ultrasonic ranging pipeline
#[derive(Parser, Debug)]
#[command(name = "uss-cli")]
#[command(about = "Drive the ultrasonic ranging pipeline with simulated sensors", long_about = None)]
#[command(version)]
struct Cli {
    /// 模拟缺失的设备名（可重复）
    #[arg(long, value_name = "NAME")]
    missing: Vec<String>,

    /// 运行秒数（缺省运行到 Ctrl-C）
    #[arg(long, value_name = "SECS")]
    duration: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let mut binding = SimulatedBinding::new();
    let mut sensors = Vec::new();
    for name in SENSORS {
        if cli.missing.iter().any(|m| m == name) {
            warn!(device = name, "simulating missing device");
        } else {
            sensors.push(binding.register(name));
        }
    }

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::Relaxed);
        })?;
    }

    let uss = UssBuilder::new(binding).build()?;
    let updater = spawn_sensor_updater(sensors, running.clone());

    let deadline = cli.duration.map(|secs| Instant::now() + Duration::from_secs(secs));
    while running.load(Ordering::Relaxed) {
        if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            running.store(false, Ordering::Relaxed);
            break;
        }

        while let Some(msg) = uss.telemetry().try_pop() {
            info!(
                fl = msg.front_left,
                fr = msg.front_right,
                l = msg.left,
                r = msg.right,
                b = msg.back,
                "range (mm)"
            );
        }
        while let Some(report) = uss.diagnostics().try_pop() {
            warn!(
                source = report.name(),
                id = report.id(),
                level = ?report.level,
                "{}",
                report.message()
            );
        }
        thread::sleep(Duration::from_millis(100));
    }

    info!("shutting down");
    uss.stop();
    let _ = updater.join();
    Ok(())
}

/// 给每个在线传感器灌一个确定性三角波（200mm ~ 2000mm）
fn spawn_sensor_updater(
    sensors: Vec<SimulatedSensor>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut tick: u32 = 0;
        while running.load(Ordering::Relaxed) {
            for (i, sensor) in sensors.iter().enumerate() {
                let phase = (tick + i as u32 * 37) % 360;
                let wave = if phase < 180 { phase } else { 360 - phase };
                sensor.set_reading(200 + wave * 10);
            }
            tick = tick.wrapping_add(1);
            thread::sleep(Duration::from_millis(50));
        }
    })
}
