//! Tracks which UI component the user is pointing at

/// Components a reviewer can point at and comment on
pub const COMPONENTS: [&str; 6] = [
    "Component 1",
    "Component 2",
    "Component 3",
    "Component 4",
    "Component 5",
    "Component 6",
];

/// Pointing state driven by pointer down / up / leave events
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    active: Option<String>,
}

impl PointerTracker {
    /// Create a tracker pointing at nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer pressed on a component
    pub fn press(&mut self, component: impl Into<String>) {
        self.active = Some(component.into());
    }

    /// Pointer released or left; returns true if something was being pointed at
    pub fn release(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Component currently pointed at
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Status line for the pointing indicator
    pub fn status(&self) -> String {
        match &self.active {
            Some(name) => format!("Pointing at {}", name),
            None => "Not pointing".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut pointer = PointerTracker::new();
        assert_eq!(pointer.status(), "Not pointing");

        pointer.press(COMPONENTS[2]);
        assert_eq!(pointer.active(), Some("Component 3"));
        assert_eq!(pointer.status(), "Pointing at Component 3");

        assert!(pointer.release());
        assert!(!pointer.release());
        assert_eq!(pointer.status(), "Not pointing");
    }
}
