//! Frame pacing
//!
//! Holds the runtime to its target frame rate. The wait sleeps in 1 ms
//! chunks until about 2 ms remain, then spins for the rest. WASM has no
//! `thread::sleep`, so it only spins.

/// Spin for the last part of the wait, in seconds
const SPIN_MARGIN: f64 = 0.002;

/// Timing of the frame that just finished.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frames started so far, this one included
    pub frame: u64,
    /// Time spent between the previous `begin_frame` and this one, minus
    /// the wait, in milliseconds
    pub work_ms: f32,
    /// `work_ms` as a percentage of the frame budget (0 when unlocked)
    pub cpu_load: f32,
}

#[cfg(not(target_arch = "wasm32"))]
mod clock {
    use std::time::Instant;

    pub struct Clock {
        epoch: Instant,
    }

    impl Clock {
        pub fn new() -> Self {
            Self { epoch: Instant::now() }
        }

        /// Seconds since the clock was created
        pub fn now(&self) -> f64 {
            self.epoch.elapsed().as_secs_f64()
        }

        pub fn wait_until(&self, deadline: f64) {
            while self.now() + super::SPIN_MARGIN < deadline {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            while self.now() < deadline {
                std::hint::spin_loop();
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod clock {
    pub struct Clock;

    impl Clock {
        pub fn new() -> Self {
            Self
        }

        pub fn now(&self) -> f64 {
            macroquad::time::get_time()
        }

        pub fn wait_until(&self, deadline: f64) {
            while self.now() < deadline {
                std::hint::spin_loop();
            }
        }
    }
}

use clock::Clock;

pub struct FramePacer {
    clock: Clock,
    /// Seconds per frame, `None` when unlocked
    frame_time: Option<f64>,
    /// When the current frame slot started
    frame_start: Option<f64>,
    frame: u64,
}

impl FramePacer {
    /// `frame_rate` of 0 runs unlocked.
    pub fn new(frame_rate: u8) -> Self {
        Self {
            clock: Clock::new(),
            frame_time: (frame_rate > 0).then(|| 1.0 / frame_rate as f64),
            frame_start: None,
            frame: 0,
        }
    }

    pub fn frame_rate(&self) -> u8 {
        match self.frame_time {
            Some(t) => (1.0 / t).round() as u8,
            None => 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Wait for the next frame slot and report on the previous frame.
    ///
    /// The first call never waits.
    pub fn begin_frame(&mut self) -> FrameStats {
        let now = self.clock.now();
        let work = self.frame_start.map_or(0.0, |start| now - start);

        if let (Some(start), Some(frame_time)) = (self.frame_start, self.frame_time) {
            let deadline = start + frame_time;
            if now < deadline {
                self.clock.wait_until(deadline);
            }
        }

        self.frame += 1;
        self.frame_start = Some(self.clock.now());

        let cpu_load = match self.frame_time {
            Some(frame_time) => (work / frame_time * 100.0) as f32,
            None => 0.0,
        };
        FrameStats {
            frame: self.frame,
            work_ms: (work * 1000.0) as f32,
            cpu_load,
        }
    }
}
