//! Sinusoidal signal components
//!
//! A [`SignalComponent`] is one term `A · sin(2π·f·t + φ)` of a composed
//! signal. Phase is always in radians.
//!
//! Editing follows a draft/commit workflow held by [`ComponentSet`]:
//!
//! ```text
//!   update_draft(f, A, φ)          commit()
//!   ───────────────────▶ [ draft ] ─────────▶ [ id 0 | id 1 | ... ]
//!                           ▲                        │
//!                           └──── reset to (0,0,0) ──┘
//! ```
//!
//! Committed components get a [`ComponentId`] that is never reused, so two
//! components sharing a frequency can still be removed individually.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// A single sinusoid
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalComponent {
    /// Frequency in Hz
    pub frequency: f64,
    /// Peak amplitude
    pub amplitude: f64,
    /// Phase offset in radians
    pub phase: f64,
}

impl SignalComponent {
    /// Create a new component
    pub fn new(frequency: f64, amplitude: f64, phase: f64) -> Self {
        Self {
            frequency,
            amplitude,
            phase,
        }
    }

    /// A component with zero amplitude or zero frequency contributes nothing
    /// a sampler needs to care about
    pub fn is_inert(&self) -> bool {
        self.amplitude == 0.0 || self.frequency == 0.0
    }

    /// Value at time `t` (seconds)
    #[inline]
    pub fn value_at(&self, t: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency * t + self.phase).sin()
    }

    /// Evaluate over a time grid
    pub fn evaluate(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.value_at(t)).collect()
    }

    /// Label shown next to the component in a list
    pub fn label(&self) -> String {
        format!(
            "{} * sin(2 * pi * {} * t + {})",
            self.amplitude, self.frequency, self.phase
        )
    }
}

/// Stable identifier assigned when a component is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A component that has been committed to a signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommittedComponent {
    pub id: ComponentId,
    #[serde(flatten)]
    pub component: SignalComponent,
}

/// Draft component plus the ordered list of committed components
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentSet {
    draft: SignalComponent,
    committed: Vec<CommittedComponent>,
    next_id: u64,
}

impl ComponentSet {
    /// Create an empty set with a neutral draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a set from persisted parts.
    ///
    /// `next_id` is raised past every committed id so ids stay unique even
    /// if the persisted counter was stale.
    pub fn from_parts(
        draft: SignalComponent,
        committed: Vec<CommittedComponent>,
        next_id: u64,
    ) -> Self {
        let floor = committed.iter().map(|c| c.id.0 + 1).max().unwrap_or(0);
        Self {
            draft,
            committed,
            next_id: next_id.max(floor),
        }
    }

    /// The component currently being edited
    pub fn draft(&self) -> &SignalComponent {
        &self.draft
    }

    /// Overwrite the draft's fields
    pub fn update_draft(&mut self, frequency: f64, amplitude: f64, phase: f64) {
        self.draft = SignalComponent::new(frequency, amplitude, phase);
    }

    /// Commit a copy of the draft and reset the draft to (0, 0, 0).
    ///
    /// An inert draft is left untouched and nothing is committed.
    pub fn commit(&mut self) -> Option<ComponentId> {
        if self.draft.is_inert() {
            return None;
        }
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        self.committed.push(CommittedComponent {
            id,
            component: self.draft,
        });
        self.draft = SignalComponent::default();
        Some(id)
    }

    /// Commit a component directly, bypassing the draft
    pub fn push(&mut self, component: SignalComponent) -> Option<ComponentId> {
        let saved = std::mem::replace(&mut self.draft, component);
        let id = self.commit();
        self.draft = saved;
        id
    }

    /// Remove the committed component with the given id
    pub fn remove(&mut self, id: ComponentId) -> Option<SignalComponent> {
        let pos = self.committed.iter().position(|c| c.id == id)?;
        Some(self.committed.remove(pos).component)
    }

    /// Committed components in insertion order
    pub fn committed(&self) -> &[CommittedComponent] {
        &self.committed
    }

    /// Next id that will be assigned
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Look up a committed component
    pub fn get(&self, id: ComponentId) -> Option<&SignalComponent> {
        self.committed
            .iter()
            .find(|c| c.id == id)
            .map(|c| &c.component)
    }

    /// Number of committed components
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// True when nothing has been committed
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Components that contribute to the signal: every committed component
    /// plus the draft when it is not inert
    pub fn active(&self) -> impl Iterator<Item = &SignalComponent> {
        let draft = (!self.draft.is_inert()).then_some(&self.draft);
        self.committed
            .iter()
            .map(|c| &c.component)
            .chain(draft)
    }

    /// Highest frequency among non-inert committed components and the draft
    pub fn maximum_frequency(&self) -> f64 {
        self.active()
            .filter(|c| !c.is_inert())
            .map(|c| c.frequency.abs())
            .fold(0.0, f64::max)
    }
}
