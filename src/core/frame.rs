use std::time::Instant;

/// Frame - timing for one render-loop step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the loop started
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Produces `FrameInfo` values. Wall-clock by default; `fixed` steps by a
/// constant delta for headless runs and tests.
#[derive(Debug, Clone)]
pub struct FrameClock {
    number: u64,
    time: f32,
    start: Option<Instant>,
    last: Option<Instant>,
    fixed_delta: Option<f32>,
}

impl FrameClock {
    pub fn wall() -> Self {
        Self {
            number: 0,
            time: 0.0,
            start: None,
            last: None,
            fixed_delta: None,
        }
    }

    pub fn fixed(delta: f32) -> Self {
        Self {
            fixed_delta: Some(delta),
            ..Self::wall()
        }
    }

    pub fn next_frame(&mut self) -> FrameInfo {
        let delta = match self.fixed_delta {
            Some(delta) => {
                self.time += delta;
                delta
            }
            None => {
                let now = Instant::now();
                let start = *self.start.get_or_insert(now);
                let delta = self.last.map_or(0.0, |last| now.duration_since(last).as_secs_f32());
                self.last = Some(now);
                self.time = now.duration_since(start).as_secs_f32();
                delta
            }
        };
        let frame = FrameInfo::new(self.number, self.time, delta);
        self.number += 1;
        frame
    }
}
