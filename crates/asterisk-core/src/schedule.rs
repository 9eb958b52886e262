//! Delayed work with cancellation tokens, and frame pacing helpers.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskToken(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    token: TaskToken,
    due_ms: f64,
    task: T,
}

/// Tasks become due at a timestamp and are drained by the frame loop.
/// A superseding event cancels the pending task through its token.
#[derive(Clone, Debug)]
pub struct DelayQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> DelayQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, task: T) -> TaskToken {
        let token = TaskToken(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            token,
            due_ms: now_ms + delay_ms.max(0.0),
            task,
        });
        token
    }

    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    /// Remove and return every task due at `now_ms`, earliest first.
    /// Tasks due at the same instant come out in scheduling order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let mut due: Vec<Entry<T>> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].due_ms <= now_ms {
                due.push(self.entries.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.token.0.cmp(&b.token.0)));
        due.into_iter().map(|e| e.task).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Caps the animation loop to a target rate without drifting.
#[derive(Clone, Debug)]
pub struct FrameThrottle {
    interval_ms: f64,
    last_ms: f64,
}

impl FrameThrottle {
    pub fn new(target_fps: f64) -> Self {
        Self {
            interval_ms: 1000.0 / target_fps.max(1.0),
            last_ms: f64::NEG_INFINITY,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Whether a frame should run at `now_ms`. Carries the remainder forward
    /// so the average rate stays on target.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        let elapsed = now_ms - self.last_ms;
        if elapsed < self.interval_ms {
            return false;
        }
        self.last_ms = if elapsed.is_finite() {
            now_ms - elapsed % self.interval_ms
        } else {
            now_ms
        };
        true
    }
}

/// Fires on the first call and then every `stride` calls.
#[derive(Clone, Debug)]
pub struct StrideCounter {
    stride: u32,
    counter: u32,
}

impl StrideCounter {
    pub fn new(stride: u32) -> Self {
        Self {
            stride: stride.max(1),
            counter: 0,
        }
    }

    pub fn tick(&mut self) -> bool {
        let fire = self.counter == 0;
        self.counter = (self.counter + 1) % self.stride;
        fire
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
