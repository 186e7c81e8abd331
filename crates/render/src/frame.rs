//! The per-tick protocol and frame statistics
//!
//! One tick: write uniforms (and shapes when the scene changed), dispatch both
//! kernels, wait for the device, then fold the elapsed time into the stats and
//! move the camera by it. Ticks never overlap.

use std::fmt;
use std::time::{Duration, Instant};

use compute::{ComputeBackend, ComputeError, DispatchPlan};
use scene::SceneError;
use tracing::debug;

use crate::commands::{Command, Effect};
use crate::context::FrameContext;
use crate::serializer::SceneBuffers;

/// Ticks per published statistics sample
pub const STATS_WINDOW: u32 = 60;

/// Monotonic time since the loop started.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Mean frame time over one stats window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceStats {
    pub frame_ms: f64,
    pub fps: u32,
}

impl PerformanceStats {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_frame_ms(frame_ms: f64) -> Self {
        let fps = if frame_ms > 0.0 {
            (1000.0 / frame_ms).round() as u32
        } else {
            0
        };
        Self { frame_ms, fps }
    }
}

impl fmt::Display for PerformanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ms ({} fps)", self.frame_ms, self.fps)
    }
}

/// Accumulates tick durations and publishes their mean every
/// [`STATS_WINDOW`] ticks.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    ticks: u32,
    accumulated: Duration,
    latest: Option<PerformanceStats>,
}

impl FrameStats {
    /// Adds one tick. Returns the new sample when this tick closes a window.
    pub fn record(&mut self, elapsed: Duration) -> Option<PerformanceStats> {
        self.ticks += 1;
        self.accumulated += elapsed;
        if self.ticks < STATS_WINDOW {
            return None;
        }
        let mean_ms = self.accumulated.as_secs_f64() * 1000.0 / f64::from(self.ticks);
        let stats = PerformanceStats::from_frame_ms(mean_ms);
        self.ticks = 0;
        self.accumulated = Duration::ZERO;
        self.latest = Some(stats);
        Some(stats)
    }

    /// The last published sample.
    pub fn latest(&self) -> Option<PerformanceStats> {
        self.latest
    }
}

/// What one completed tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub frame_index: u64,
    pub elapsed: Duration,
    /// Set on the tick that closed a stats window
    pub stats: Option<PerformanceStats>,
    /// Shapes uploaded this tick
    pub shapes_written: Option<usize>,
}

pub struct FrameLoop<C: Clock = SystemClock> {
    context: FrameContext,
    buffers: SceneBuffers,
    stats: FrameStats,
    clock: C,
    frame_index: u64,
}

impl FrameLoop<SystemClock> {
    pub fn new(context: FrameContext) -> Self {
        Self::with_clock(context, SystemClock::new())
    }
}

impl<C: Clock> FrameLoop<C> {
    pub fn with_clock(context: FrameContext, clock: C) -> Self {
        Self {
            buffers: SceneBuffers::new(context.store().capacity()),
            context,
            stats: FrameStats::default(),
            clock,
            frame_index: 0,
        }
    }

    /// Runs one tick against `backend`.
    ///
    /// On error nothing after the failed step happens: no stats, no camera
    /// movement. Pending shape uploads are not retried because the writes
    /// were already queued.
    pub fn tick<B: ComputeBackend + ?Sized>(&mut self, backend: &mut B) -> Result<TickReport, ComputeError> {
        let start = self.clock.now();

        let uniforms = self.context.uniforms(start.as_secs_f32());
        self.buffers.write_uniforms(backend, &uniforms);
        let shapes_written = self
            .context
            .take_shapes_dirty()
            .then(|| self.buffers.write_shapes(backend, self.context.store()));

        let plan = DispatchPlan::new(self.context.store().total(), self.context.resolution())?;
        backend.submit(&plan)?;

        let elapsed = self.clock.now().saturating_sub(start);
        let stats = self.stats.record(elapsed);
        if let Some(stats) = stats {
            debug!(frame = self.frame_index, %stats, "frame stats");
        }
        self.context.advance_camera(elapsed.as_secs_f32());

        let report = TickReport {
            frame_index: self.frame_index,
            elapsed,
            stats,
            shapes_written,
        };
        self.frame_index += 1;
        Ok(report)
    }

    pub fn apply(&mut self, command: Command) -> Result<Effect, SceneError> {
        self.context.apply(command)
    }

    pub fn context(&self) -> &FrameContext {
        &self.context
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}
