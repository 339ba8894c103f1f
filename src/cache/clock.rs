use std::time::SystemTime;

pub type ClockType = Box<dyn Clock + Send + Sync>;

#[derive(Clone)]
pub struct SystemClock {}

/// Clock is used while building a [`crate::cache::policy::cache_policy::CachePolicy`] relative to "now",
/// and by callers that want to check whether a stored policy has expired.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;

    fn has_passed(&self, time: &SystemTime) -> bool {
        self.now().gt(time)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {}
    }

    pub fn boxed() -> ClockType {
        Box::new(SystemClock::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}
