//! Status and plan enums for marketplace entities.
//!
//! Wire names match the backend's stored values exactly (`6_months`,
//! `cancelled`, ...), so these types serialize straight into store filters
//! and payloads.

use serde::{Deserialize, Serialize};

/// Vendor membership plan, determining the membership window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipPlan {
    #[serde(rename = "6_months")]
    SixMonths,
    #[serde(rename = "1_year")]
    OneYear,
    #[serde(rename = "2_years")]
    TwoYears,
}

impl MembershipPlan {
    /// Calendar-month offset added to a membership's end date.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::TwoYears => 24,
        }
    }
}

impl std::fmt::Display for MembershipPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SixMonths => write!(f, "6_months"),
            Self::OneYear => write!(f, "1_year"),
            Self::TwoYears => write!(f, "2_years"),
        }
    }
}

impl std::str::FromStr for MembershipPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "6_months" => Ok(Self::SixMonths),
            "1_year" => Ok(Self::OneYear),
            "2_years" => Ok(Self::TwoYears),
            _ => Err(format!("invalid membership plan: {s}")),
        }
    }
}

/// Vendor membership status.
///
/// `Cancelled` is terminal in this design, with one deliberate exception:
/// extending a cancelled membership forces it back to `Active` (see the
/// membership service).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    #[default]
    Active,
    Cancelled,
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// Guest list RSVP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_offsets() {
        assert_eq!(MembershipPlan::SixMonths.months(), 6);
        assert_eq!(MembershipPlan::OneYear.months(), 12);
        assert_eq!(MembershipPlan::TwoYears.months(), 24);
    }

    #[test]
    fn test_plan_wire_names() {
        assert_eq!(
            serde_json::to_string(&MembershipPlan::SixMonths).unwrap(),
            "\"6_months\""
        );
        let plan: MembershipPlan = serde_json::from_str("\"2_years\"").unwrap();
        assert_eq!(plan, MembershipPlan::TwoYears);
    }

    #[test]
    fn test_plan_display_matches_wire() {
        for plan in [
            MembershipPlan::SixMonths,
            MembershipPlan::OneYear,
            MembershipPlan::TwoYears,
        ] {
            let parsed: MembershipPlan = plan.to_string().parse().unwrap();
            assert_eq!(parsed, plan);
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&MembershipStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        assert_eq!(
            serde_json::to_string(&RsvpStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
