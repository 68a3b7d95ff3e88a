pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 25;
pub const DEFAULT_LIMIT: usize = 5;

/// Clamp a requested entry count into `[MIN_LIMIT, MAX_LIMIT]`.
/// Zero and negative requests become `MIN_LIMIT`.
pub fn clamp_limit(requested: i64) -> usize {
    requested.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as usize
}
