use crate::animation::ease::Ease;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimerOpts {
    pub progress: u32,
    pub duration: u32,
    pub delay: u32,
    pub reverse: bool,
    pub ease: Ease,
}

impl Default for TimerOpts {
    fn default() -> Self {
        Self {
            progress: 0,
            duration: 1,
            delay: 0,
            reverse: false,
            ease: Ease::Linear,
        }
    }
}

/// Frame-stepped progress counter.
///
/// Each [`Timer::next`] consumes one tick: either one frame of the delay phase or one step of
/// progress. `progress` never leaves `0..=duration`. On reaching a bound the timer flips
/// direction and re-arms its delay when `reverse` is set, otherwise it restarts at the origin
/// bound of its current direction.
#[derive(Clone, Debug)]
pub struct Timer {
    progress: u32,
    duration: u32,
    delay: u32,
    wait: u32,
    reverse: bool,
    ease: Ease,
    direction: Direction,
    paused: bool,
}

impl Timer {
    pub fn new(opts: TimerOpts) -> Self {
        let duration = opts.duration.max(1);
        Self {
            progress: opts.progress.min(duration),
            duration,
            delay: opts.delay,
            wait: opts.delay,
            reverse: opts.reverse,
            ease: opts.ease,
            direction: Direction::Forward,
            paused: false,
        }
    }

    pub fn next(&mut self) {
        if self.paused {
            return;
        }
        if self.wait > 0 {
            self.wait -= 1;
            return;
        }
        match self.direction {
            Direction::Forward => {
                self.progress = (self.progress + 1).min(self.duration);
                if self.progress == self.duration {
                    self.on_bound(Direction::Backward);
                }
            }
            Direction::Backward => {
                self.progress = self.progress.saturating_sub(1);
                if self.progress == 0 {
                    self.on_bound(Direction::Forward);
                }
            }
        }
    }

    fn on_bound(&mut self, flipped: Direction) {
        self.wait = self.delay;
        if self.reverse {
            self.direction = flipped;
        } else {
            self.progress = self.origin();
        }
    }

    fn origin(&self) -> u32 {
        match self.direction {
            Direction::Forward => 0,
            Direction::Backward => self.duration,
        }
    }

    /// Restart from the origin bound of the current direction, re-arming the delay.
    pub fn reset(&mut self) {
        self.wait = self.delay;
        self.progress = self.origin();
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Linear completion in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        f64::from(self.progress) / f64::from(self.duration)
    }

    /// Eased completion.
    pub fn value(&self) -> f64 {
        self.ease.apply(self.fraction())
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_waiting(&self) -> bool {
        self.wait > 0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(TimerOpts::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timer.rs"]
mod tests;
