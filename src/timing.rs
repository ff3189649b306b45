use crate::utils::LassoError;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::OpenOptions,
    io::Write,
    time::Duration,
};

/// A record of timing information for one coarse phase of a path run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTimingRecord {
    /// Name of the phase (e.g., "grid_generate", "pool_bind", "path_solve")
    pub phase: String,
    /// Duration of the phase in milliseconds
    pub duration_ms: f64,
    /// Unix timestamp when the phase was recorded
    pub timestamp: u64,
}

/// A record of timing information for a single per-lambda solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveTimingRecord {
    /// Path index of the solve
    pub index: usize,
    /// Penalty value the solve ran at
    pub lambda: f32,
    /// Device that performed the solve
    pub device: usize,
    /// Duration of the solve in milliseconds
    pub duration_ms: f64,
    /// Unix timestamp when the solve was recorded
    pub timestamp: u64,
}

/// Performance tracking for path runs.
///
/// `TimingTracker` collects coarse phase durations and per-solve durations,
/// and provides statistics and CSV export. It is used internally by the
/// path scheduler; callers may record their own phases through it.
pub struct TimingTracker {
    phase_timings: Vec<PhaseTimingRecord>,
    solve_timings: Vec<SolveTimingRecord>,
}

impl TimingTracker {
    pub fn new() -> Self {
        Self {
            phase_timings: Vec::new(),
            solve_timings: Vec::new(),
        }
    }

    pub fn record_phase(&mut self, phase: &str, duration: Duration) {
        let record = PhaseTimingRecord {
            phase: phase.to_string(),
            duration_ms: duration.as_secs_f64() * 1000.0,
            timestamp: unix_timestamp(),
        };
        self.phase_timings.push(record);
    }

    pub fn record_solve(&mut self, index: usize, lambda: f32, device: usize, duration: Duration) {
        let record = SolveTimingRecord {
            index,
            lambda,
            device,
            duration_ms: duration.as_secs_f64() * 1000.0,
            timestamp: unix_timestamp(),
        };
        self.solve_timings.push(record);
    }

    pub fn write_phase_timings_to_csv(&self, filename: &str) -> Result<(), LassoError> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(filename)
            .map_err(|e| LassoError::from_string(format!("Failed to create timing file: {}", e)))?;

        writeln!(file, "phase,duration_ms,timestamp")
            .map_err(|e| LassoError::from_string(format!("Failed to write header: {}", e)))?;

        for record in &self.phase_timings {
            writeln!(
                file,
                "{},{:.3},{}",
                record.phase, record.duration_ms, record.timestamp
            )
            .map_err(|e| {
                LassoError::from_string(format!("Failed to write timing record: {}", e))
            })?;
        }

        Ok(())
    }

    pub fn write_solve_timings_to_csv(&self, filename: &str) -> Result<(), LassoError> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(filename)
            .map_err(|e| {
                LassoError::from_string(format!("Failed to create solve timing file: {}", e))
            })?;

        writeln!(file, "index,lambda,device,duration_ms,timestamp")
            .map_err(|e| LassoError::from_string(format!("Failed to write header: {}", e)))?;

        for record in &self.solve_timings {
            writeln!(
                file,
                "{},{:e},{},{:.3},{}",
                record.index, record.lambda, record.device, record.duration_ms, record.timestamp
            )
            .map_err(|e| {
                LassoError::from_string(format!("Failed to write solve timing record: {}", e))
            })?;
        }

        Ok(())
    }

    pub fn get_phase_statistics(&self) -> HashMap<String, (f64, f64, usize)> {
        let mut stats = HashMap::new();

        for record in &self.phase_timings {
            let entry = stats
                .entry(record.phase.clone())
                .or_insert((0.0f64, 0.0f64, 0));
            entry.0 += record.duration_ms;
            entry.1 = entry.1.max(record.duration_ms);
            entry.2 += 1;
        }

        // Convert to (average, max, count)
        for (_, stats) in stats.iter_mut() {
            stats.0 /= stats.2 as f64;
        }

        stats
    }

    pub fn get_device_statistics(&self) -> HashMap<usize, (f64, f64, usize)> {
        let mut stats = HashMap::new();

        for record in &self.solve_timings {
            let entry = stats.entry(record.device).or_insert((0.0f64, 0.0f64, 0));
            entry.0 += record.duration_ms;
            entry.1 = entry.1.max(record.duration_ms);
            entry.2 += 1;
        }

        // Convert to (average, max, count)
        for (_, stats) in stats.iter_mut() {
            stats.0 /= stats.2 as f64;
        }

        stats
    }

    /// The collected per-solve records.
    pub fn solve_timings(&self) -> &[SolveTimingRecord] {
        &self.solve_timings
    }
}

fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
