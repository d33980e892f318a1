//! View routing: which screen a profile gets for a requested view name

use serde::{Deserialize, Serialize};

use crate::models::Profile;

/// Screens of the single-page client
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Scanner,
    /// Scanner replaced by the upgrade prompt
    LimitReached,
    Dashboard,
    Settings,
    Upgrade,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Scanner => "scanner",
            View::LimitReached => "limit_reached",
            View::Dashboard => "dashboard",
            View::Settings => "settings",
            View::Upgrade => "upgrade",
        }
    }

    /// Resolve a requested view name for a profile.
    ///
    /// Unknown names and non-admin requests for `settings` fall back to the
    /// scanner, which itself becomes `limit_reached` once a free account is
    /// out of scans.
    pub fn resolve(requested: &str, profile: &Profile) -> View {
        let view = match requested.trim().to_lowercase().as_str() {
            "dashboard" => View::Dashboard,
            "settings" if profile.is_admin => View::Settings,
            "upgrade" => View::Upgrade,
            _ => View::Scanner,
        };

        if view == View::Scanner && profile.is_at_limit() {
            View::LimitReached
        } else {
            view
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavItem {
    pub view: View,
    pub label: String,
    pub active: bool,
}

/// Navigation state for the header plus the resolved view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Navigation {
    pub view: View,
    pub items: Vec<NavItem>,
    pub usage: String,
    pub can_scan: bool,
    /// `None` when the profile is not bound by the counter
    pub remaining_scans: Option<i64>,
}

impl Navigation {
    pub fn build(requested: &str, profile: &Profile) -> Self {
        let view = View::resolve(requested, profile);
        let active = match view {
            View::LimitReached => View::Scanner,
            other => other,
        };

        let mut entries = vec![(View::Scanner, "Scanner"), (View::Dashboard, "Documents")];
        if profile.is_admin {
            entries.push((View::Settings, "Settings"));
        }
        if !profile.is_premium() {
            entries.push((View::Upgrade, "Upgrade"));
        }

        let items = entries
            .into_iter()
            .map(|(v, label)| NavItem {
                view: v,
                label: label.to_string(),
                active: v == active,
            })
            .collect();

        Self {
            view,
            items,
            usage: profile.usage_label(),
            can_scan: profile.can_scan(),
            remaining_scans: profile.remaining_scans(),
        }
    }
}
