//! Dependency wiring
//!
//! Runs once, after every instance exists and before the route table is
//! built. Each declared slot is resolved exactly once: look up the computed
//! key, assign on a hit, leave the slot unset on a miss. Misses are a
//! reported outcome rather than a failure, matching the container's
//! tolerant startup contract — but they are never silent in the report.

use crate::registry::Registry;
use serde::Serialize;

/// The result of resolving one injection slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WireOutcome {
    /// Dependency found and written into the slot.
    Assigned,
    /// No registry entry under the computed key; slot left unset.
    Miss { key: String },
    /// An entry exists but its stored type does not fit the slot.
    Mismatch { key: String },
}

/// One slot's resolution, for the startup report.
#[derive(Debug, Clone, Serialize)]
pub struct SlotReport {
    pub component: String,
    pub field: &'static str,
    pub outcome: WireOutcome,
}

/// Everything the wiring pass did, in pass order.
#[derive(Debug, Serialize)]
pub struct WireReport {
    pub slots: Vec<SlotReport>,
}

impl WireReport {
    pub fn is_fully_wired(&self) -> bool {
        self.slots
            .iter()
            .all(|s| s.outcome == WireOutcome::Assigned)
    }

    pub fn misses(&self) -> impl Iterator<Item = &SlotReport> {
        self.slots
            .iter()
            .filter(|s| !matches!(s.outcome, WireOutcome::Assigned))
    }
}

pub struct Wirer;

impl Wirer {
    /// Fill every declared slot of every constructed component.
    ///
    /// Idempotent: slots are set-at-most-once, so a second pass reports the
    /// same outcomes and changes no field values.
    pub fn wire(registry: &Registry) -> WireReport {
        let mut slots = Vec::new();
        for component in registry.constructed() {
            for slot in &component.def.slots {
                let key = slot.key();
                let outcome = match registry.get(key) {
                    None => {
                        tracing::warn!(
                            component = %component.def.qualified_name,
                            field = slot.field,
                            key = %key,
                            "no registry entry for injection key, slot left unset"
                        );
                        WireOutcome::Miss {
                            key: key.to_string(),
                        }
                    }
                    Some(dep) => {
                        if (slot.assign)(&component.holder, dep) {
                            WireOutcome::Assigned
                        } else {
                            tracing::warn!(
                                component = %component.def.qualified_name,
                                field = slot.field,
                                key = %key,
                                "registry entry does not fit slot type, slot left unset"
                            );
                            WireOutcome::Mismatch {
                                key: key.to_string(),
                            }
                        }
                    }
                };
                slots.push(SlotReport {
                    component: component.def.qualified_name.clone(),
                    field: slot.field,
                    outcome,
                });
            }
        }
        WireReport { slots }
    }
}
