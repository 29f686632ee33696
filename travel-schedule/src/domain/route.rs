//! The origin/destination pair chosen on the main search screen.

use serde::{Deserialize, Serialize};

/// One end of a route: what the user sees and the code sent to the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEnd {
    pub title: String,
    pub code: String,
}

impl RouteEnd {
    pub fn new(title: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            code: code.into(),
        }
    }

    fn is_set(&self) -> bool {
        !self.code.trim().is_empty()
    }
}

/// Origin and destination selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSelection {
    pub from: RouteEnd,
    pub to: RouteEnd,
}

impl RouteSelection {
    pub fn new(from: RouteEnd, to: RouteEnd) -> Self {
        Self { from, to }
    }

    /// Both ends have a code.
    pub fn can_search(&self) -> bool {
        self.from.is_set() && self.to.is_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_search_needs_both_codes() {
        let moscow = RouteEnd::new("Москва", "s2000001");
        assert!(!RouteSelection::default().can_search());
        assert!(!RouteSelection::new(moscow.clone(), RouteEnd::default()).can_search());
        assert!(!RouteSelection::new(moscow.clone(), RouteEnd::new("Пермь", "  ")).can_search());
        assert!(RouteSelection::new(moscow, RouteEnd::new("Пермь", "s9607404")).can_search());
    }
}
