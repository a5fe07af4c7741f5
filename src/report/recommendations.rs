//! Action recommendations derived from a report.

use super::schema::MetricsReport;
use crate::utils::config::INVESTMENT_RECOMMENDATION_FLOOR;
use serde::{Deserialize, Serialize};
use std::fmt;

/// At most this many recommendations are returned
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Control and audit the A-class groups
    FocusAClass,
    /// Staffing and monitoring on peak dates
    FocusPeakPeriods,
    /// Audit the entities on the Pareto frontier
    FocusFrontier,
    /// The scenario justifies the considered investment
    Invest,
}

/// A single prioritized action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
    /// Value the recommendation is about, currency
    pub amount: f64,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Prioritized recommendations for `report`
///
/// Order is fixed: A-class, peak periods, frontier, investment. A segment
/// with zero value produces nothing, so the empty report yields an empty list.
pub fn recommendations(report: &MetricsReport) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if report.a_class_value > 0.0 {
        recs.push(Recommendation {
            kind: RecommendationKind::FocusAClass,
            message: format!(
                "Focus on A-class groups: {:.0} ({:.1}% of total)",
                report.a_class_value,
                report.a_class_share()
            ),
            amount: report.a_class_value,
        });
    }

    if report.peak_value > 0.0 {
        recs.push(Recommendation {
            kind: RecommendationKind::FocusPeakPeriods,
            message: format!("Work on peak periods: {:.0} on the top days", report.peak_value),
            amount: report.peak_value,
        });
    }

    if report.frontier_value > 0.0 {
        recs.push(Recommendation {
            kind: RecommendationKind::FocusFrontier,
            message: format!(
                "Audit the {} frontier entities (80/20): {:.0}",
                report.pareto.frontier_count(),
                report.frontier_value
            ),
            amount: report.frontier_value,
        });
    }

    if report.savings.total > INVESTMENT_RECOMMENDATION_FLOOR {
        recs.push(Recommendation {
            kind: RecommendationKind::Invest,
            message: format!(
                "Invest up to {:.0}: expected return {:.1}%",
                report.scenarios.investments, report.roi
            ),
            amount: report.scenarios.investments,
        });
    }

    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}
