use std::sync::OnceLock;

/// A set-at-most-once injectable field.
///
/// Components declare their dependencies as `Slot<Arc<dyn Cap>>` (or a
/// concrete `Slot<Arc<T>>`) and the wirer fills them after construction.
/// A second assignment is a no-op, which makes the wiring pass idempotent,
/// and an unfilled slot simply reads as `None`.
///
/// # Example
/// ```
/// use wirefront::component::Slot;
/// use std::sync::Arc;
///
/// trait UserService: Send + Sync {}
///
/// #[derive(Default)]
/// struct UserController {
///     user_service: Slot<Arc<dyn UserService>>,
/// }
/// ```
pub struct Slot<T>(OnceLock<T>);

impl<T> Slot<T> {
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Fill the slot. Returns `false` if it was already filled, in which
    /// case the existing value is kept.
    pub fn set(&self, value: T) -> bool {
        self.0.set(value).is_ok()
    }

    pub fn get(&self) -> Option<&T> {
        self.0.get()
    }

    pub fn is_set(&self) -> bool {
        self.0.get().is_some()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_set_is_ignored() {
        let slot = Slot::new();
        assert!(slot.set(1));
        assert!(!slot.set(2));
        assert_eq!(slot.get(), Some(&1));
    }

    #[test]
    fn unfilled_slot_reads_none() {
        let slot: Slot<i32> = Slot::default();
        assert!(!slot.is_set());
        assert_eq!(slot.get(), None);
    }
}
