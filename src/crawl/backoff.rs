use rand::Rng;
use std::time::Duration;

/// Exponent cap for the refetch delay (base * 2^6 at most).
const MAX_EXPONENT: u32 = 6;

/// Exponential delay with ±30% jitter before refetch number `attempt` (0-based).
pub fn refetch_delay(attempt: u32, base_delay_ms: u64) -> Duration {
    if base_delay_ms == 0 {
        return Duration::ZERO;
    }

    let capped_attempt = attempt.min(MAX_EXPONENT);
    let base_delay = base_delay_ms.saturating_mul(2_u64.saturating_pow(capped_attempt));

    let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
    let delay_with_jitter = (base_delay as f64 * jitter_factor).round() as u64;

    Duration::from_millis(delay_with_jitter)
}
