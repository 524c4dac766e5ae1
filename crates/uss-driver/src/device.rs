//! Device seam - the boundary to the platform driver layer
//!
//! Binding and register-level access to the actual ultrasonic hardware is
//! owned by the platform; this subsystem only sees the two traits below.
//!
//! **Contract**:
//! - `bind` is attempted exactly once per device name, at process start.
//!   The result is permanent: there is no retry path.
//! - `sample` is a single short hardware read. A `None` result is a silent
//!   transient failure; the caller keeps its stale cached value.

/// One bound ultrasonic ranging device.
///
/// Implementations must not block for longer than a bus transaction;
/// the fetcher loop calls `sample` once per poll interval.
pub trait RangeDevice: Send {
    /// Read the current distance in millimeters.
    ///
    /// Returns `None` when no reading is available this cycle. Failures
    /// do not raise and are not reported; the decision what to do with a
    /// missing reading belongs to the caller.
    fn sample(&mut self) -> Option<u32>;
}

/// Name-based device lookup provided by the platform driver layer.
pub trait DeviceBinding {
    /// Resolve a device name to a bound handle, or `None` if the device
    /// is absent. The result is final for the process lifetime.
    fn bind(&self, name: &str) -> Option<Box<dyn RangeDevice>>;
}
