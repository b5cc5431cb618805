//! Goal funding: priority-weighted allocation and annuity-based
//! contribution solving
//!
//! Current savings are split across goals proportional to priority weight
//! (rank 1 -> 3, rank 2 -> 2, else 1); each dated goal's remaining gap is
//! solved for a required monthly contribution by inverting the
//! future-value-of-annuity formula.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::dates::months_between;
use crate::household::GoalItem;

/// Cap on the completion-search loop; beyond this a goal reports "not
/// achievable" rather than iterating forever
pub const MAX_GOAL_MONTHS: u32 = 600;

/// Funding analysis for one goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalFunding {
    pub goal_id: u32,
    pub name: String,
    /// Share of current savings allocated to this goal
    pub allocated: f64,
    /// Weight-proportional share of total capacity, in [0, 1]
    pub share: f64,
    /// Months from the anchor date to the target date; None when undated
    pub months_to_target: Option<u32>,
    /// Allocated savings grown to the target date
    pub projected_at_target: Option<f64>,
    /// Target minus projected savings, floored at zero
    pub funding_gap: Option<f64>,
    /// Monthly contribution that closes the gap by the target date
    pub required_monthly_contribution: Option<f64>,
    /// Months of contributions at the goal's capacity share until the
    /// target is met; None when undated or beyond the search cap
    pub projected_completion_months: Option<u32>,
    pub on_track: bool,
}

/// Result of a full planning pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalFundingPlan {
    pub goals: Vec<GoalFunding>,
    pub total_allocated: f64,
}

/// Future-value-of-annuity inversion: the level contribution whose value
/// after `months` periods at `monthly_rate` equals `gap`. Zero rate
/// degenerates to straight division.
pub fn required_contribution(gap: f64, monthly_rate: f64, months: u32) -> f64 {
    if gap <= 0.0 {
        return 0.0;
    }
    if months == 0 {
        return gap;
    }
    if monthly_rate == 0.0 {
        return gap / months as f64;
    }
    let annuity_factor = ((1.0 + monthly_rate).powi(months as i32) - 1.0) / monthly_rate;
    gap / annuity_factor
}

/// Months of compounding `balance` plus a level `contribution` until
/// `target` is reached. Bounded by `MAX_GOAL_MONTHS`: None means not
/// achievable inside the cap (including the no-growth, no-contribution
/// case).
pub fn months_to_reach(
    balance: f64,
    contribution: f64,
    monthly_rate: f64,
    target: f64,
) -> Option<u32> {
    if balance >= target {
        return Some(0);
    }
    let mut value = balance;
    for month in 1..=MAX_GOAL_MONTHS {
        value = value * (1.0 + monthly_rate) + contribution;
        if value >= target {
            return Some(month);
        }
    }
    None
}

/// Net worth at which withdrawals at `safe_withdrawal_rate` cover
/// `annual_expenses` indefinitely
pub fn fi_number(annual_expenses: f64, safe_withdrawal_rate: f64) -> f64 {
    if safe_withdrawal_rate <= 0.0 {
        return f64::INFINITY;
    }
    annual_expenses / safe_withdrawal_rate
}

/// Allocate current savings across prioritized goals and solve each dated
/// goal for its required monthly contribution.
///
/// `monthly_capacity` is the household's available monthly savings; a
/// goal is on track when its required contribution fits inside its
/// weight-proportional share of that capacity. Goals without a target
/// date receive an allocation but no contribution analysis.
pub fn plan_goals(
    current_savings: f64,
    monthly_capacity: f64,
    annual_rate: f64,
    anchor_date: NaiveDate,
    goals: &[GoalItem],
) -> GoalFundingPlan {
    let total_weight: f64 = goals.iter().map(GoalItem::priority_weight).sum();
    if goals.is_empty() || total_weight <= 0.0 {
        return GoalFundingPlan {
            goals: Vec::new(),
            total_allocated: 0.0,
        };
    }

    let monthly_rate = annual_rate / 12.0;
    let mut rows = Vec::with_capacity(goals.len());

    for goal in goals {
        let share = goal.priority_weight() / total_weight;
        let allocated = current_savings * share;
        let capacity_share = monthly_capacity * share;

        let months_to_target = goal.target_date.and_then(|target| {
            let months = months_between(anchor_date, target);
            if months < 0 {
                warn!(
                    "goal '{}' has a target date before the anchor date",
                    goal.name
                );
                None
            } else {
                Some(months as u32)
            }
        });

        let (projected, gap, required, completion, on_track) = match months_to_target {
            Some(months) => {
                let projected = allocated * (1.0 + monthly_rate).powi(months as i32);
                let gap = (goal.target_amount - projected).max(0.0);
                let required = required_contribution(gap, monthly_rate, months);
                let completion =
                    months_to_reach(allocated, capacity_share, monthly_rate, goal.target_amount);
                (
                    Some(projected),
                    Some(gap),
                    Some(required),
                    completion,
                    required <= capacity_share,
                )
            }
            None => {
                // Undated: still search for a completion estimate at the
                // goal's capacity share, bounded like everything else
                let completion =
                    months_to_reach(allocated, capacity_share, monthly_rate, goal.target_amount);
                (None, None, None, completion, false)
            }
        };

        rows.push(GoalFunding {
            goal_id: goal.id,
            name: goal.name.clone(),
            allocated,
            share,
            months_to_target,
            projected_at_target: projected,
            funding_gap: gap,
            required_monthly_contribution: required,
            projected_completion_months: completion,
            on_track,
        });
    }

    GoalFundingPlan {
        total_allocated: rows.iter().map(|g| g.allocated).sum(),
        goals: rows,
    }
}
