//! Host load sampler
//!
//! A background thread polls CPU load and network throughput and turns them
//! into spawn parameters for new balls. The main loop reads the latest values
//! through [`SpawnKnobs`] without locking; a stale value is fine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::consts::NET_SATURATION_BYTES_PER_SEC;

/// Radius and speed bound given to newly spawned balls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub radius: f32,
    /// Velocity components are drawn from [-speed, speed]
    pub speed: f32,
}

impl SpawnParams {
    /// Scale `base` by a load sample: CPU grows the radius, network grows the speed
    pub fn from_load(base: SpawnParams, sample: LoadSample) -> Self {
        let cpu = sample.cpu.clamp(0.0, 1.0);
        let net = if sample.net_bytes_per_sec.is_finite() && sample.net_bytes_per_sec > 0.0 {
            (sample.net_bytes_per_sec / NET_SATURATION_BYTES_PER_SEC).min(1.0) as f32
        } else {
            0.0
        };
        Self {
            radius: base.radius * (1.0 + cpu),
            speed: base.speed * (1.0 + net),
        }
    }
}

/// Latest spawn parameters, shared between the sampler and the main loop
#[derive(Debug)]
pub struct SpawnKnobs {
    radius_bits: AtomicU32,
    speed_bits: AtomicU32,
}

impl SpawnKnobs {
    pub fn new(initial: SpawnParams) -> Self {
        Self {
            radius_bits: AtomicU32::new(initial.radius.to_bits()),
            speed_bits: AtomicU32::new(initial.speed.to_bits()),
        }
    }

    pub fn load(&self) -> SpawnParams {
        SpawnParams {
            radius: f32::from_bits(self.radius_bits.load(Ordering::Relaxed)),
            speed: f32::from_bits(self.speed_bits.load(Ordering::Relaxed)),
        }
    }

    pub fn store(&self, params: SpawnParams) {
        self.radius_bits.store(params.radius.to_bits(), Ordering::Relaxed);
        self.speed_bits.store(params.speed.to_bits(), Ordering::Relaxed);
    }
}

/// One load measurement
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadSample {
    /// Busy fraction of all CPUs, 0..=1
    pub cpu: f32,
    /// Received + transmitted bytes per second, all non-loopback interfaces
    pub net_bytes_per_sec: f64,
}

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {0}")]
    Malformed(&'static str),
}

/// Source of load measurements
pub trait LoadProbe: Send {
    /// Take a measurement. `Ok(None)` means no window is available yet
    /// (the first call of a delta-based probe).
    fn sample(&mut self) -> Result<Option<LoadSample>, SamplerError>;
}

const PROC_STAT: &str = "/proc/stat";
const PROC_NET_DEV: &str = "/proc/net/dev";

/// Linux probe reading `/proc/stat` and `/proc/net/dev`
#[derive(Debug, Default)]
pub struct ProcLoadProbe {
    last_cpu: Option<CpuTimes>,
    last_net: Option<(u64, Instant)>,
}

impl ProcLoadProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadProbe for ProcLoadProbe {
    fn sample(&mut self) -> Result<Option<LoadSample>, SamplerError> {
        let stat = read_proc(PROC_STAT)?;
        let net_dev = read_proc(PROC_NET_DEV)?;
        let cpu_now = parse_cpu_times(&stat)?;
        let net_now = (parse_net_bytes(&net_dev)?, Instant::now());

        let prev_cpu = self.last_cpu.replace(cpu_now);
        let prev_net = self.last_net.replace(net_now);

        let (Some(prev_cpu), Some((prev_bytes, prev_at))) = (prev_cpu, prev_net) else {
            return Ok(None);
        };

        let elapsed = net_now.1.duration_since(prev_at).as_secs_f64();
        let net_bytes_per_sec = if elapsed > 0.0 {
            net_now.0.saturating_sub(prev_bytes) as f64 / elapsed
        } else {
            0.0
        };

        Ok(Some(LoadSample {
            cpu: cpu_now.busy_fraction_since(&prev_cpu),
            net_bytes_per_sec,
        }))
    }
}

fn read_proc(path: &'static str) -> Result<String, SamplerError> {
    std::fs::read_to_string(path).map_err(|source| SamplerError::Io { path, source })
}

/// Aggregate jiffies from the first `cpu` line of `/proc/stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuTimes {
    busy: u64,
    total: u64,
}

impl CpuTimes {
    fn busy_fraction_since(&self, earlier: &CpuTimes) -> f32 {
        let total = self.total.saturating_sub(earlier.total);
        if total == 0 {
            return 0.0;
        }
        let busy = self.busy.saturating_sub(earlier.busy);
        (busy as f64 / total as f64).clamp(0.0, 1.0) as f32
    }
}

fn parse_cpu_times(stat: &str) -> Result<CpuTimes, SamplerError> {
    let line = stat
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or(SamplerError::Malformed(PROC_STAT))?;

    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|_| SamplerError::Malformed(PROC_STAT))?;

    // user nice system idle iowait irq softirq steal ...
    if fields.len() < 4 {
        return Err(SamplerError::Malformed(PROC_STAT));
    }
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    let total: u64 = fields.iter().take(8).sum();
    Ok(CpuTimes {
        busy: total.saturating_sub(idle),
        total,
    })
}

fn parse_net_bytes(net_dev: &str) -> Result<u64, SamplerError> {
    let mut bytes = 0u64;
    // Two header lines, then "iface: rx_bytes ... tx_bytes ..."
    for line in net_dev.lines().skip(2) {
        let Some((iface, counters)) = line.split_once(':') else {
            return Err(SamplerError::Malformed(PROC_NET_DEV));
        };
        if iface.trim() == "lo" {
            continue;
        }
        let fields: Vec<&str> = counters.split_whitespace().collect();
        if fields.len() < 9 {
            return Err(SamplerError::Malformed(PROC_NET_DEV));
        }
        let rx: u64 = fields[0]
            .parse()
            .map_err(|_| SamplerError::Malformed(PROC_NET_DEV))?;
        let tx: u64 = fields[8]
            .parse()
            .map_err(|_| SamplerError::Malformed(PROC_NET_DEV))?;
        bytes = bytes.saturating_add(rx).saturating_add(tx);
    }
    Ok(bytes)
}

/// Running sampler thread
#[derive(Debug)]
pub struct SamplerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SamplerHandle {
    /// Ask the thread to exit and wait for it
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            thread.thread().unpark();
            if thread.join().is_err() {
                log::warn!("Load sampler thread panicked");
            }
        }
    }
}

/// Start polling `probe` every `interval`, publishing into `knobs`.
///
/// Failed reads and the first (windowless) sample publish `base` unchanged.
pub fn spawn_sampler<P: LoadProbe + 'static>(
    mut probe: P,
    knobs: Arc<SpawnKnobs>,
    base: SpawnParams,
    interval: Duration,
) -> std::io::Result<SamplerHandle> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let thread = std::thread::Builder::new()
        .name("load-sampler".into())
        .spawn(move || {
            log::debug!("Load sampler started ({:?} interval)", interval);
            while !stop_flag.load(Ordering::Relaxed) {
                let params = match probe.sample() {
                    Ok(Some(sample)) => SpawnParams::from_load(base, sample),
                    Ok(None) => base,
                    Err(e) => {
                        log::warn!("Load sample failed, using neutral load: {}", e);
                        base
                    }
                };
                knobs.store(params);
                std::thread::park_timeout(interval);
            }
            log::debug!("Load sampler stopped");
        })?;

    Ok(SamplerHandle {
        stop,
        thread: Some(thread),
    })
}
