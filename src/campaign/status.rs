use std::fmt::{self, Display};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Percentage of the budget at which a campaign starts to warn.
const WARNING_PERCENTAGE: i64 = 80;

/// Percentage of the budget at which a campaign is over budget.
const OVER_BUDGET_PERCENTAGE: i64 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CampaignStatus {
    #[serde(rename = "No Budget")]
    NoBudget,
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "Warning")]
    Warning,
    #[serde(rename = "Over Budget")]
    OverBudget,
}

impl CampaignStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CampaignStatus::NoBudget => "No Budget",
            CampaignStatus::OnTrack => "On Track",
            CampaignStatus::Warning => "Warning",
            CampaignStatus::OverBudget => "Over Budget",
        }
    }
}

impl Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies how much of `budget` has been spent.
///
/// A zero budget is always `NoBudget`. Otherwise the spend percentage
/// `spend / budget * 100` is compared against 100 and 80, both inclusive.
/// Both amounts are non-negative, so the percentage is compared by
/// cross-multiplying instead of dividing and no rounding can move a value
/// across a threshold.
pub fn evaluate_status(budget: Money, spend: Money) -> CampaignStatus {
    if budget.is_zero() {
        return CampaignStatus::NoBudget;
    }

    let budget = budget.amount();
    let spend_percentage = spend.amount() * Decimal::ONE_HUNDRED;

    if spend_percentage >= budget * Decimal::from(OVER_BUDGET_PERCENTAGE) {
        CampaignStatus::OverBudget
    } else if spend_percentage >= budget * Decimal::from(WARNING_PERCENTAGE) {
        CampaignStatus::Warning
    } else {
        CampaignStatus::OnTrack
    }
}
