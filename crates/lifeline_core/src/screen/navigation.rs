//! Screen stack.
//!
//! # Invariants
//! - The root screen (`EmergencyNumber`) is always at the bottom and is never
//!   popped.
//! - Navigating to the screen already on top is a no-op.

use super::ScreenName;

/// Header button shown on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderAction {
    pub title: &'static str,
    pub target: ScreenName,
}

/// Header action on the root screen.
pub const ABOUT_HEADER_ACTION: HeaderAction = HeaderAction {
    title: "About",
    target: ScreenName::About,
};

/// In-screen navigation button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationButton {
    pub title: &'static str,
    pub target: ScreenName,
}

/// Buttons rendered under the emergency number form.
pub const ROOT_NAVIGATION_BUTTONS: [NavigationButton; 3] = [
    NavigationButton {
        title: "Go to Contacts",
        target: ScreenName::Contacts,
    },
    NavigationButton {
        title: "Go to Weather and Time",
        target: ScreenName::WeatherAndTime,
    },
    NavigationButton {
        title: "Go to About",
        target: ScreenName::About,
    },
];

/// Ordered stack of visible screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<ScreenName>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub const ROOT: ScreenName = ScreenName::EmergencyNumber;

    pub fn new() -> Self {
        Self {
            stack: vec![Self::ROOT],
        }
    }

    pub fn current(&self) -> ScreenName {
        *self.stack.last().unwrap_or(&Self::ROOT)
    }

    /// Bottom-to-top view of the stack.
    pub fn stack(&self) -> &[ScreenName] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Pushes `target`; returns `false` when it is already on top.
    pub fn navigate(&mut self, target: ScreenName) -> bool {
        if self.current() == target {
            return false;
        }
        self.stack.push(target);
        true
    }

    /// Pops the top screen; returns it, or `None` on the root.
    pub fn back(&mut self) -> Option<ScreenName> {
        if !self.can_go_back() {
            return None;
        }
        self.stack.pop()
    }

    /// Header action for the current screen.
    pub fn header_action(&self) -> Option<HeaderAction> {
        (self.current() == Self::ROOT).then_some(ABOUT_HEADER_ACTION)
    }

    pub fn navigation_buttons(&self) -> &'static [NavigationButton] {
        if self.current() == Self::ROOT {
            &ROOT_NAVIGATION_BUTTONS
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Navigator, ABOUT_HEADER_ACTION};
    use crate::screen::ScreenName;

    #[test]
    fn starts_at_root_with_about_header() {
        let navigator = Navigator::new();
        assert_eq!(navigator.current(), ScreenName::EmergencyNumber);
        assert_eq!(navigator.header_action(), Some(ABOUT_HEADER_ACTION));
        assert_eq!(navigator.navigation_buttons().len(), 3);
        assert!(!navigator.can_go_back());
    }

    #[test]
    fn navigate_pushes_and_back_pops() {
        let mut navigator = Navigator::new();
        assert!(navigator.navigate(ScreenName::Contacts));
        assert!(navigator.navigate(ScreenName::About));
        assert_eq!(
            navigator.stack(),
            &[
                ScreenName::EmergencyNumber,
                ScreenName::Contacts,
                ScreenName::About
            ]
        );
        assert_eq!(navigator.header_action(), None);

        assert_eq!(navigator.back(), Some(ScreenName::About));
        assert_eq!(navigator.back(), Some(ScreenName::Contacts));
        assert_eq!(navigator.back(), None);
        assert_eq!(navigator.current(), ScreenName::EmergencyNumber);
    }

    #[test]
    fn navigating_to_current_screen_is_noop() {
        let mut navigator = Navigator::new();
        assert!(navigator.navigate(ScreenName::WeatherAndTime));
        assert!(!navigator.navigate(ScreenName::WeatherAndTime));
        assert_eq!(navigator.depth(), 2);
    }

    #[test]
    fn header_action_jumps_to_about() {
        let mut navigator = Navigator::new();
        let action = navigator.header_action().expect("root header action");
        assert!(navigator.navigate(action.target));
        assert_eq!(navigator.current(), ScreenName::About);
    }
}
