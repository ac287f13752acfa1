//! Compute device selection.

use std::fmt;
use std::str::FromStr;

/// Where a restored model's parameters should live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Device {
    #[default]
    Cpu,
    /// CUDA device by ordinal.
    Cuda(u32),
}

impl Device {
    /// Map the integer device convention: negative means CPU, otherwise a CUDA ordinal.
    pub fn from_cuda_index(index: i64) -> Self {
        match u32::try_from(index) {
            Ok(ordinal) => Self::Cuda(ordinal),
            Err(_) => Self::Cpu,
        }
    }

    pub fn is_cpu(&self) -> bool {
        matches!(self, Self::Cpu)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(ordinal) => write!(f, "cuda:{}", ordinal),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    /// Accepts `cpu`, `cuda`, `cuda:N`, or a bare integer (`-1` for CPU).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "cpu" => return Ok(Self::Cpu),
            "cuda" => return Ok(Self::Cuda(0)),
            _ => {}
        }
        if let Some(ordinal) = s.strip_prefix("cuda:") {
            return ordinal
                .parse::<u32>()
                .map(Self::Cuda)
                .map_err(|_| format!("invalid CUDA ordinal: {}", ordinal));
        }
        s.parse::<i64>()
            .map(Self::from_cuda_index)
            .map_err(|_| format!("invalid device: {}", s))
    }
}
