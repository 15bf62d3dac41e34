//! Equity curve: chronological samples with drawdown statistics.

use super::EquityPoint;
use crate::shared::BoundedSeries;
use crate::ws::DomainEvent;
use rust_decimal::Decimal;

/// Summary over the retained window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EquityStats {
    pub now: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    /// Distance of `now` below `high`, in percent.
    pub drawdown_pct: Decimal,
    /// Worst peak-to-trough decline across the window, in percent.
    pub max_drawdown_pct: Decimal,
}

#[derive(Debug, Clone)]
pub struct EquityCurve {
    points: BoundedSeries<EquityPoint>,
}

impl EquityCurve {
    pub const DEFAULT_CAP: usize = 2000;

    pub fn new(cap: usize) -> Self {
        Self {
            points: BoundedSeries::new(cap),
        }
    }

    pub fn apply(&mut self, event: &DomainEvent) {
        if let DomainEvent::Equity(point) = event {
            self.push(*point);
        }
    }

    pub fn push(&mut self, point: EquityPoint) {
        self.points.push_back(point);
    }

    /// Samples, oldest first.
    pub fn points(&self) -> impl DoubleEndedIterator<Item = &EquityPoint> + ExactSizeIterator {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&EquityPoint> {
        self.points.back()
    }

    /// `None` until the first sample arrives.
    pub fn stats(&self) -> Option<EquityStats> {
        let now = self.points.back()?.value;

        let mut high = now;
        let mut low = now;
        let mut peak = Decimal::ZERO;
        let mut max_drawdown_pct = Decimal::ZERO;
        for p in self.points.iter() {
            high = high.max(p.value);
            low = low.min(p.value);
            peak = peak.max(p.value);
            max_drawdown_pct = max_drawdown_pct.max(drawdown_pct(peak, p.value));
        }

        Some(EquityStats {
            now,
            high,
            low,
            drawdown_pct: drawdown_pct(high, now),
            max_drawdown_pct,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for EquityCurve {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAP)
    }
}

/// Zero when the peak is not positive or the arithmetic leaves `Decimal` range.
fn drawdown_pct(peak: Decimal, value: Decimal) -> Decimal {
    if peak <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    peak.checked_sub(value)
        .and_then(|drop| drop.checked_div(peak))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ts: i64, value: i64) -> DomainEvent {
        DomainEvent::Equity(EquityPoint {
            ts,
            value: Decimal::from(value),
        })
    }

    #[test]
    fn test_empty_has_no_stats() {
        assert!(EquityCurve::default().stats().is_none());
    }

    #[test]
    fn test_drawdown_statistics() {
        let mut curve = EquityCurve::default();
        for (i, v) in [100, 120, 90, 110].into_iter().enumerate() {
            curve.apply(&point(i as i64, v));
        }
        let stats = curve.stats().unwrap();
        assert_eq!(stats.now, Decimal::from(110));
        assert_eq!(stats.high, Decimal::from(120));
        assert_eq!(stats.low, Decimal::from(90));
        // (120 - 110) / 120
        assert_eq!(stats.drawdown_pct.round_dp(4), Decimal::new(83333, 4));
        // (120 - 90) / 120
        assert_eq!(stats.max_drawdown_pct, Decimal::from(25));
    }

    #[test]
    fn test_capped_window_evicts_oldest() {
        let mut curve = EquityCurve::new(3);
        for i in 0..5 {
            curve.apply(&point(i, 100 + i));
        }
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.points().next().unwrap().ts, 2);
        assert_eq!(curve.stats().unwrap().low, Decimal::from(102));
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let mut curve = EquityCurve::default();
        for frame in [
            r#"{"type":"equity","value":"79228162514264337593543950335","ts":1}"#,
            r#"{"type":"equity","value":"1","ts":2}"#,
        ] {
            curve.apply(&crate::ws::normalize(frame).unwrap());
        }
        assert_eq!(curve.len(), 2);

        let stats = curve.stats().unwrap();
        assert_eq!(stats.high, Decimal::MAX);
        assert_eq!(stats.now, Decimal::ONE);
        assert!(stats.drawdown_pct > Decimal::from(99));
        assert!(stats.drawdown_pct <= Decimal::ONE_HUNDRED);
        assert_eq!(stats.max_drawdown_pct, stats.drawdown_pct);

        curve.apply(&point(3, -1));
        curve.push(EquityPoint {
            ts: 4,
            value: Decimal::MIN,
        });
        // MAX - MIN leaves the representable range.
        assert_eq!(curve.stats().unwrap().drawdown_pct, Decimal::ZERO);
    }

    #[test]
    fn test_ignores_other_events() {
        let mut curve = EquityCurve::default();
        curve.apply(&DomainEvent::Raw("x".into()));
        assert!(curve.is_empty());
    }
}
