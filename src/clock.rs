//! Frame clock: tick counter plus animation time, handed to the renderer
//! once per frame.

use std::time::Instant;

/// Where animation time comes from
#[derive(Debug, Clone, Copy)]
enum TimeSource {
    /// Seconds since the clock was created
    WallClock(Instant),
    /// `tick / fps`, so recorded frames are evenly spaced
    Fixed { fps: u32 },
}

/// Everything a frame needs from the outside world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Frames since startup, starting at 0
    pub tick: u64,
    /// Animation time (seconds)
    pub time_s: f32,
}

impl FrameContext {
    /// Width / height, with zero-sized viewports treated as 1 pixel
    pub fn aspect_ratio(&self) -> f32 {
        self.viewport_width.max(1) as f32 / self.viewport_height.max(1) as f32
    }
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    source: TimeSource,
    tick: u64,
}

impl FrameClock {
    pub fn wall_clock() -> Self {
        Self {
            source: TimeSource::WallClock(Instant::now()),
            tick: 0,
        }
    }

    /// Clock whose time advances exactly `1 / fps` per frame
    pub fn fixed_rate(fps: u32) -> Self {
        Self {
            source: TimeSource::Fixed { fps: fps.max(1) },
            tick: 0,
        }
    }

    /// Frames handed out so far
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Context for the current tick, without consuming it.
    ///
    /// Asking again before [`advance`](Self::advance) repeats the same tick,
    /// so a frame that failed to render can be retried.
    pub fn frame(&self, viewport_width: u32, viewport_height: u32) -> FrameContext {
        let time_s = match self.source {
            TimeSource::WallClock(start) => start.elapsed().as_secs_f32(),
            TimeSource::Fixed { fps } => (self.tick as f64 / fps as f64) as f32,
        };
        FrameContext {
            viewport_width,
            viewport_height,
            tick: self.tick,
            time_s,
        }
    }

    /// Mark the current tick as rendered
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Context for the next frame; advances the tick by one
    pub fn next_frame(&mut self, viewport_width: u32, viewport_height: u32) -> FrameContext {
        let frame = self.frame(viewport_width, viewport_height);
        self.advance();
        frame
    }
}
