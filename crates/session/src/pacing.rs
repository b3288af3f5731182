use std::time::Duration;
use tokio::time::sleep;

/// How long to wait between iterations. The upstream APIs are rate-limited
/// and iterations run strictly sequentially, so this is the only throttle.
#[derive(Debug, Clone)]
pub enum PacingPolicy {
    /// No pause (tests, local mock backends)
    None,
    /// Constant delay between iterations
    Fixed(Duration),
    /// Delay doubles each iteration up to a ceiling
    Exponential { initial: Duration, max: Duration },
}

impl Default for PacingPolicy {
    fn default() -> Self {
        PacingPolicy::Fixed(Duration::from_secs(3))
    }
}

impl PacingPolicy {
    /// Pause before iteration `iteration` (1-based; never called before the
    /// first iteration).
    pub async fn pause(&self, iteration: usize) {
        let delay = self.delay_for(iteration);
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    fn delay_for(&self, iteration: usize) -> Duration {
        match self {
            PacingPolicy::None => Duration::ZERO,
            PacingPolicy::Fixed(d) => *d,
            PacingPolicy::Exponential { initial, max } => {
                let factor = 1u32 << (iteration.saturating_sub(1)).min(16) as u32;
                (*initial * factor).min(*max)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay() {
        let policy = PacingPolicy::Fixed(Duration::from_secs(3));
        assert_eq!(policy.delay_for(1), Duration::from_secs(3));
        assert_eq!(policy.delay_for(5), Duration::from_secs(3));
    }

    #[test]
    fn test_exponential_caps_at_max() {
        let policy = PacingPolicy::Exponential {
            initial: Duration::from_millis(100),
            max: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(4), Duration::from_millis(500));
        assert_eq!(policy.delay_for(60), Duration::from_millis(500));
    }

    #[test]
    fn test_none_is_zero() {
        assert_eq!(PacingPolicy::None.delay_for(3), Duration::ZERO);
    }
}
