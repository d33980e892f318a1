//! Subscription plan catalogue shown on the upgrade screen

use serde::Serialize;

use crate::models::SubscriptionType;

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub tier: SubscriptionType,
    pub name: &'static str,
    /// `None` for unlimited
    pub max_scans: Option<i64>,
    pub features: Vec<&'static str>,
}

/// Free and premium plans with the given scan allowances
pub fn plans(free_max_scans: i64) -> Vec<Plan> {
    vec![
        Plan {
            tier: SubscriptionType::Free,
            name: "Free",
            max_scans: Some(free_max_scans),
            features: vec![
                "Basic text extraction",
                "Standard support",
                "Basic accuracy",
            ],
        },
        Plan {
            tier: SubscriptionType::Premium,
            name: "Premium",
            max_scans: None,
            features: vec![
                "Unlimited scans",
                "Advanced AI processing",
                "Priority support",
                "Higher accuracy",
                "Document management",
                "Export options",
            ],
        },
    ]
}
