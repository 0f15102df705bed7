//! Eligibility of a precompressed variant.
//!
//! Pure decision logic: no I/O, so it can be exercised directly.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::storage::Resource;

/// Outcome of checking one variant against its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantCheck {
    /// Not older than the original and strictly smaller: serve it.
    Fresh,
    /// Modified before the original; it was not regenerated.
    Stale,
    /// Same size or larger than the original; no benefit.
    NotSmaller,
}

impl VariantCheck {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantCheck::Fresh => "served",
            VariantCheck::Stale => "stale",
            VariantCheck::NotSmaller => "not_smaller",
        }
    }
}

/// Decide whether `variant` may stand in for `original`.
///
/// Timestamps are compared at one-second resolution and equal timestamps count
/// as fresh, so tools that only preserve whole seconds do not cause spurious
/// rejections.
pub fn check_variant(original: &Resource, variant: &Resource) -> VariantCheck {
    if round_to_second(variant.modified) < round_to_second(original.modified) {
        return VariantCheck::Stale;
    }
    if variant.size >= original.size {
        return VariantCheck::NotSmaller;
    }
    VariantCheck::Fresh
}

/// Seconds since the Unix epoch, rounded half away from zero.
pub fn round_to_second(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64 + i64::from(d.subsec_nanos() >= 500_000_000),
        Err(e) => {
            let d = e.duration();
            -(d.as_secs() as i64 + i64::from(d.subsec_nanos() >= 500_000_000))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64, millis: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs) + Duration::from_millis(millis)
    }

    fn resource(size: u64, modified: SystemTime) -> Resource {
        Resource {
            size,
            modified,
            is_dir: false,
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to_second(at(10, 0)), 10);
        assert_eq!(round_to_second(at(10, 499)), 10);
        assert_eq!(round_to_second(at(10, 500)), 11);
        assert_eq!(round_to_second(UNIX_EPOCH - Duration::from_millis(1500)), -2);
        assert_eq!(round_to_second(UNIX_EPOCH - Duration::from_millis(1200)), -1);
    }

    #[test]
    fn fresh_and_smaller_is_served() {
        let original = resource(100, at(1000, 0));
        assert_eq!(check_variant(&original, &resource(40, at(1001, 0))), VariantCheck::Fresh);
    }

    #[test]
    fn equal_timestamps_are_fresh() {
        let original = resource(100, at(1000, 0));
        assert_eq!(check_variant(&original, &resource(40, at(1000, 0))), VariantCheck::Fresh);
    }

    #[test]
    fn sub_second_difference_is_tolerated() {
        // Both round to 1000.
        let original = resource(100, at(1000, 300));
        let variant = resource(40, at(999, 600));
        assert_eq!(check_variant(&original, &variant), VariantCheck::Fresh);
    }

    #[test]
    fn older_variant_is_stale() {
        let original = resource(100, at(1000, 0));
        assert_eq!(check_variant(&original, &resource(40, at(998, 0))), VariantCheck::Stale);
        // 999.4 rounds to 999, 1000.0 to 1000.
        assert_eq!(check_variant(&original, &resource(40, at(999, 400))), VariantCheck::Stale);
    }

    #[test]
    fn size_must_be_strictly_smaller() {
        let original = resource(100, at(1000, 0));
        assert_eq!(
            check_variant(&original, &resource(100, at(1000, 0))),
            VariantCheck::NotSmaller
        );
        assert_eq!(
            check_variant(&original, &resource(101, at(1000, 0))),
            VariantCheck::NotSmaller
        );
    }

    #[test]
    fn staleness_is_checked_first() {
        let original = resource(100, at(1000, 0));
        assert_eq!(check_variant(&original, &resource(500, at(10, 0))), VariantCheck::Stale);
    }
}
