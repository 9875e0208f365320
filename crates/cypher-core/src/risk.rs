//! Normalizes URL reputation statistics into a risk summary.

use serde::{Deserialize, Serialize};

/// Per-engine verdict counts from the last URL analysis.
///
/// Keys absent from the source payload count as zero; unknown keys are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisStats {
    pub harmless: u64,
    pub malicious: u64,
    pub suspicious: u64,
    pub undetected: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub harmless: u64,
    pub malicious: u64,
    pub suspicious: u64,
    pub undetected: u64,
    /// Percentage in `[0.0, 100.0]`, rounded to two decimals.
    pub risk_score: f64,
}

impl RiskSummary {
    pub fn flagged(&self) -> u128 {
        u128::from(self.malicious) + u128::from(self.suspicious)
    }

    pub fn total(&self) -> u128 {
        u128::from(self.harmless) + self.flagged() + u128::from(self.undetected)
    }
}

/// Total function: a URL with no reports at all scores 0.0.
///
/// Sums are taken in `u128`, so no combination of `u64` counts can overflow.
pub fn summarize(stats: &AnalysisStats) -> RiskSummary {
    let mut summary = RiskSummary {
        harmless: stats.harmless,
        malicious: stats.malicious,
        suspicious: stats.suspicious,
        undetected: stats.undetected,
        risk_score: 0.0,
    };
    let raw = 100.0 * summary.flagged() as f64 / summary.total().max(1) as f64;
    summary.risk_score = round2(raw.clamp(0.0, 100.0));
    summary
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(harmless: u64, malicious: u64, suspicious: u64, undetected: u64) -> AnalysisStats {
        AnalysisStats {
            harmless,
            malicious,
            suspicious,
            undetected,
        }
    }

    #[test]
    fn empty_payload_scores_zero() {
        let parsed: AnalysisStats = serde_json::from_str("{}").unwrap();
        let s = summarize(&parsed);
        assert_eq!((s.harmless, s.malicious, s.suspicious, s.undetected), (0, 0, 0, 0));
        assert_eq!(s.risk_score, 0.0);
    }

    #[test]
    fn all_flagged_scores_hundred() {
        assert_eq!(summarize(&stats(0, 5, 5, 0)).risk_score, 100.0);
    }

    #[test]
    fn partial_flags_score_proportionally() {
        let s = summarize(&stats(90, 5, 5, 0));
        assert_eq!(s.risk_score, 10.0);
        assert_eq!(s.flagged(), 10);
        assert_eq!(s.total(), 100);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(summarize(&stats(2, 1, 0, 0)).risk_score, 33.33);
        assert_eq!(summarize(&stats(1, 2, 0, 0)).risk_score, 66.67);
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let parsed: AnalysisStats =
            serde_json::from_str(r#"{"malicious": 18446744073709551615, "suspicious": 1}"#)
                .unwrap();
        let s = summarize(&parsed);
        assert_eq!(s.risk_score, 100.0);
        assert_eq!(s.flagged(), u128::from(u64::MAX) + 1);

        let s = summarize(&stats(u64::MAX, u64::MAX, 0, u64::MAX));
        assert_eq!(s.risk_score, 33.33);
    }

    #[test]
    fn missing_and_extra_keys_are_tolerated() {
        let parsed: AnalysisStats =
            serde_json::from_str(r#"{"malicious": 3, "harmless": 1, "timeout": 4}"#).unwrap();
        assert_eq!(parsed, stats(1, 3, 0, 0));
        assert_eq!(summarize(&parsed).risk_score, 75.0);
    }
}
