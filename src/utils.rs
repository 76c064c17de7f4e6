//! Utility helpers: arm-name capping, normal quantiles.

/// Longest arm name, in UTF-8 bytes, that fits a 64-byte transport key
/// (chat callback payloads, fixed-width columns).
pub const MAX_ARM_NAME_BYTES: usize = 63;

/// Two-sided 95% standard-normal quantile, `z_{0.975}`.
pub const Z_975: f64 = 1.959_963_984_540_054;

/// Cut `name` to at most `max_bytes` bytes without splitting a character.
///
/// Callers should cap names this way before using them as keys; the bandit
/// itself accepts names of any length.
///
/// # Example
///
/// ```rust
/// use tripbandit::{truncate_arm_name, MAX_ARM_NAME_BYTES};
///
/// let long = "маршрут через центр города и набережную, с пересадкой";
/// let cut = truncate_arm_name(long, MAX_ARM_NAME_BYTES);
/// assert!(cut.len() <= MAX_ARM_NAME_BYTES);
/// assert!(long.starts_with(cut));
/// ```
pub fn truncate_arm_name(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }
    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
