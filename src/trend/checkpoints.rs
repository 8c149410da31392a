//! Generation of the evenly spaced checkpoints a trend is evaluated at.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::error::TrendError;
use crate::trend::types::Checkpoints;

/// Weeks counted per month when converting a timespan into checkpoints.
pub const WEEKS_PER_MONTH: i64 = 4;

/// Upper bound on the checkpoints one plan may yield. Ten years sampled
/// daily stays well below it.
pub const MAX_CHECKPOINTS: usize = 100_000;

/// A value that can be moved backwards by a step without wrapping around.
pub trait StepBack: Sized {
    type Step;

    /// Returns `None` when the result would not be representable.
    fn step_back(&self, step: &Self::Step) -> Option<Self>;
}

impl StepBack for DateTime<Utc> {
    type Step = TimeDelta;

    fn step_back(&self, step: &TimeDelta) -> Option<Self> {
        self.checked_sub_signed(*step)
    }
}

impl StepBack for i64 {
    type Step = i64;

    fn step_back(&self, step: &i64) -> Option<Self> {
        self.checked_sub(*step)
    }
}

impl StepBack for u64 {
    type Step = u64;

    fn step_back(&self, step: &u64) -> Option<Self> {
        self.checked_sub(*step)
    }
}

/// How far back to look and how densely to sample.
///
/// `timespan` is expressed in a coarse unit and `interval` in a finer one;
/// `units_per_span` converts between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckpointPlan {
    pub timespan: i64,
    pub interval: i64,
    pub units_per_span: i64,
}

impl CheckpointPlan {
    /// A plan spanning `timespan` months, sampled every `interval` weeks.
    pub fn months_by_weeks(timespan: i64, interval: i64) -> Self {
        Self {
            timespan,
            interval,
            units_per_span: WEEKS_PER_MONTH,
        }
    }

    /// Number of checkpoints this plan yields, "now" included. Plans above
    /// [`MAX_CHECKPOINTS`] are rejected.
    pub fn count(&self) -> Result<usize, TrendError> {
        if self.interval <= 0 {
            return Err(TrendError::InvalidConfig(format!(
                "interval must be positive, got {}",
                self.interval
            )));
        }
        if self.timespan < 0 {
            return Err(TrendError::InvalidConfig(format!(
                "timespan must not be negative, got {}",
                self.timespan
            )));
        }
        if self.units_per_span <= 0 {
            return Err(TrendError::InvalidConfig(format!(
                "units per span must be positive, got {}",
                self.units_per_span
            )));
        }

        let count = self
            .timespan
            .checked_mul(self.units_per_span)
            .map(|units| units / self.interval)
            .and_then(|steps| usize::try_from(steps).ok())
            .and_then(|steps| steps.checked_add(1))
            .ok_or_else(|| TrendError::InvalidConfig("timespan is too large".into()))?;

        if count > MAX_CHECKPOINTS {
            return Err(TrendError::InvalidConfig(format!(
                "plan yields {count} checkpoints, at most {MAX_CHECKPOINTS} are allowed"
            )));
        }
        Ok(count)
    }

    /// Walks back from `now` by `step`, then returns the points oldest first.
    pub fn checkpoints<V: StepBack + Ord>(
        &self,
        now: V,
        step: &V::Step,
    ) -> Result<Checkpoints<V>, TrendError> {
        let count = self.count()?;
        let mut points = Vec::with_capacity(count);
        points.push(now);

        while points.len() < count {
            let latest = &points[points.len() - 1];
            let previous = latest.step_back(step).ok_or_else(|| {
                TrendError::InvalidConfig("checkpoints reach beyond the representable range".into())
            })?;
            if previous >= *latest {
                return Err(TrendError::InvalidConfig(
                    "step must move checkpoints backwards".into(),
                ));
            }
            points.push(previous);
        }

        points.reverse();
        Ok(Checkpoints::from_ascending(points))
    }

    /// Calendar checkpoints ending at `now`, spaced `interval` weeks apart.
    pub fn dates(&self, now: DateTime<Utc>) -> Result<Checkpoints<DateTime<Utc>>, TrendError> {
        let step = TimeDelta::try_weeks(self.interval).ok_or_else(|| {
            TrendError::InvalidConfig(format!("interval of {} weeks is too large", self.interval))
        })?;
        self.checkpoints(now, &step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_count_six_months_every_two_weeks() {
        let plan = CheckpointPlan::months_by_weeks(6, 2);
        assert_eq!(plan.count().unwrap(), 13);
    }

    #[test]
    fn test_count_floors_partial_interval() {
        // 1 month = 4 weeks, sampled every 3 weeks: one full step back
        let plan = CheckpointPlan::months_by_weeks(1, 3);
        assert_eq!(plan.count().unwrap(), 2);
    }

    #[test]
    fn test_zero_timespan_is_just_now() {
        let plan = CheckpointPlan::months_by_weeks(0, 2);
        let checkpoints = plan.checkpoints(100i64, &7).unwrap();
        assert_eq!(checkpoints.as_slice(), &[100]);
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        for interval in [0, -2] {
            let err = CheckpointPlan::months_by_weeks(6, interval).count().unwrap_err();
            assert!(matches!(err, TrendError::InvalidConfig(_)));
        }
    }

    #[test]
    fn test_rejects_negative_timespan() {
        let err = CheckpointPlan::months_by_weeks(-1, 2).count().unwrap_err();
        assert!(matches!(err, TrendError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_overflowing_timespan() {
        let err = CheckpointPlan::months_by_weeks(i64::MAX, 1).count().unwrap_err();
        assert!(matches!(err, TrendError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_plan_above_checkpoint_cap() {
        let plan = CheckpointPlan {
            timespan: i64::MAX / 4,
            interval: 1,
            units_per_span: 4,
        };
        assert!(matches!(plan.count(), Err(TrendError::InvalidConfig(_))));
        assert!(matches!(
            plan.checkpoints(i64::MAX, &1),
            Err(TrendError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_plan_at_checkpoint_cap_is_accepted() {
        let plan = CheckpointPlan {
            timespan: (MAX_CHECKPOINTS - 1) as i64,
            interval: 1,
            units_per_span: 1,
        };
        assert_eq!(plan.count().unwrap(), MAX_CHECKPOINTS);

        let too_many = CheckpointPlan {
            timespan: MAX_CHECKPOINTS as i64,
            ..plan
        };
        assert!(too_many.count().is_err());
    }

    #[test]
    fn test_counter_checkpoints_ascend_to_now() {
        let plan = CheckpointPlan::months_by_weeks(1, 2);
        let checkpoints = plan.checkpoints(100i64, &10).unwrap();
        assert_eq!(checkpoints.as_slice(), &[80, 90, 100]);
    }

    #[test]
    fn test_unsigned_underflow_is_an_error() {
        let plan = CheckpointPlan::months_by_weeks(6, 2);
        let err = plan.checkpoints(5u64, &1).unwrap_err();
        assert!(matches!(err, TrendError::InvalidConfig(_)));
    }

    #[test]
    fn test_non_decreasing_step_is_an_error() {
        let plan = CheckpointPlan::months_by_weeks(1, 2);
        let err = plan.checkpoints(100i64, &0).unwrap_err();
        assert!(matches!(err, TrendError::InvalidConfig(_)));
    }

    #[test]
    fn test_dates_are_weekly_spaced_and_end_at_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let checkpoints = CheckpointPlan::months_by_weeks(6, 2).dates(now).unwrap();

        assert_eq!(checkpoints.len(), 13);
        assert_eq!(checkpoints.last(), Some(&now));
        assert_eq!(
            checkpoints.first(),
            Some(&(now - TimeDelta::weeks(24)))
        );
        for pair in checkpoints.as_slice().windows(2) {
            assert_eq!(pair[1] - pair[0], TimeDelta::weeks(2));
        }
    }

    #[test]
    fn test_same_anchor_is_deterministic() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let plan = CheckpointPlan::months_by_weeks(3, 1);
        assert_eq!(plan.dates(now).unwrap(), plan.dates(now).unwrap());
    }
}
