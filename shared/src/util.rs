use std::sync::LazyLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Low 12 bits of every generated id; randomly seeded per process
static SEQUENCE: LazyLock<AtomicI64> = LazyLock::new(|| {
    use rand::Rng;
    AtomicI64::new(rand::thread_rng().gen_range(0..0x1000))
});

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-process sequence (4096 ids per ms before reuse)
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xFFF; // 12 bits
    (ts << 12) | seq
}
