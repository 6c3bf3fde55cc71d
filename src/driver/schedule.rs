use std::time::Duration;

/// Waits between ticks. The loop never suspends anywhere else.
pub trait Scheduler {
    fn wait(&mut self, delay: Duration);
}

/// Blocks the current thread for the requested delay.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;

impl Scheduler for ThreadSleep {
    fn wait(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Never waits; records the delays it was asked for. For offline rendering and tests.
#[derive(Clone, Debug, Default)]
pub struct Immediate {
    pub waited: Vec<Duration>,
}

impl Scheduler for Immediate {
    fn wait(&mut self, delay: Duration) {
        self.waited.push(delay);
    }
}
