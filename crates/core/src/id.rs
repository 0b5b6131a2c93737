// SPDX-License-Identifier: MIT

//! Opaque identifiers used across the daemon.

crate::define_id! {
    /// Identifier for a single queued/executing [`crate::Action`] instance.
    pub struct ActionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(ActionId::new(), ActionId::new());
    }

    #[test]
    fn from_string_round_trips_through_display() {
        let id = ActionId::from_string("abc123");
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id.as_str(), "abc123");
    }
}
