use candle_core::Device;
use tracing::{debug, warn};

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

use super::error::EmbeddingError;

/// Picks the first available GPU backend enabled at compile time, else CPU.
///
/// Never fails today: an unavailable GPU degrades to CPU with a warning. The
/// `Result` is kept so callers do not change when a hard requirement is added.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!(backend = "metal", "GPU acceleration enabled");
            return Ok(device);
        }
        Err(e) => {
            warn!(backend = "metal", error = %e, "GPU backend unavailable");
            failures.push(format!("metal: {e}"));
        }
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!(backend = "cuda", "GPU acceleration enabled");
            return Ok(device);
        }
        Err(e) => {
            warn!(backend = "cuda", error = %e, "GPU backend unavailable");
            failures.push(format!("cuda: {e}"));
        }
    }

    if failures.is_empty() {
        debug!("No GPU backend compiled, using CPU");
    } else {
        warn!(reasons = %failures.join("; "), "Falling back to CPU device");
    }
    Ok(Device::Cpu)
}

/// Short name for logs.
pub fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}
