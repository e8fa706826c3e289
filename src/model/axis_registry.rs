use indexmap::IndexMap;
use tracing::warn;

use crate::core::axis::{Axis, AxisPosition};
use crate::error::{PlotError, PlotResult};

/// Stable handle to an axis registered in a plot model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxisId(usize);

/// Role an axis plays for a series or annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRole {
    /// Horizontal cartesian axis, or the magnitude axis of a polar plot.
    X,
    /// Vertical cartesian axis, or the angle axis of a polar plot.
    Y,
    Color,
}

impl AxisRole {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Color => "color",
        }
    }

    /// Whether `axis` is a default candidate for this role.
    fn is_default_for(self, axis: &Axis) -> bool {
        match self {
            Self::X => {
                !axis.is_color_axis()
                    && (axis.is_horizontal() || axis.position == AxisPosition::Magnitude)
            }
            Self::Y => {
                !axis.is_color_axis()
                    && (axis.is_vertical() || axis.position == AxisPosition::Angle)
            }
            Self::Color => axis.is_color_axis(),
        }
    }

    /// Whether an axis bound explicitly by key may serve this role.
    ///
    /// Any positional axis may be bound as x or y; transposed plots bind a
    /// vertical axis as x.
    fn accepts_keyed(self, axis: &Axis) -> bool {
        match self {
            Self::X | Self::Y => !axis.is_color_axis(),
            Self::Color => axis.is_color_axis(),
        }
    }
}

#[derive(Debug, Clone)]
struct AxisEntry {
    axis: Axis,
    /// Created by the model because no axis of the role existed.
    is_default: bool,
}

/// Insertion-ordered axis storage with key lookup.
#[derive(Debug, Clone, Default)]
pub struct AxisRegistry {
    entries: IndexMap<AxisId, AxisEntry>,
    next_id: usize,
}

impl AxisRegistry {
    /// Registers `axis`; keys must be unique within the registry.
    ///
    /// Model-created default axes of the same role are dropped so that the
    /// new axis takes over.
    pub fn add(&mut self, axis: Axis) -> PlotResult<AxisId> {
        if let Some(key) = axis.key() {
            if self.find_by_key(key).is_some() {
                return Err(PlotError::InvalidConfiguration(format!(
                    "axis key `{key}` is already registered"
                )));
            }
        }
        for role in [AxisRole::X, AxisRole::Y] {
            if role.is_default_for(&axis) {
                self.entries
                    .retain(|_, entry| !(entry.is_default && role.is_default_for(&entry.axis)));
            }
        }
        Ok(self.insert(axis, false))
    }

    pub(crate) fn add_default(&mut self, axis: Axis) -> AxisId {
        self.insert(axis, true)
    }

    fn insert(&mut self, axis: Axis, is_default: bool) -> AxisId {
        let id = AxisId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, AxisEntry { axis, is_default });
        id
    }

    pub fn remove(&mut self, id: AxisId) -> Option<Axis> {
        self.entries.shift_remove(&id).map(|entry| entry.axis)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: AxisId) -> Option<&Axis> {
        self.entries.get(&id).map(|entry| &entry.axis)
    }

    pub fn get_mut(&mut self, id: AxisId) -> Option<&mut Axis> {
        self.entries.get_mut(&id).map(|entry| &mut entry.axis)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AxisId, &Axis)> {
        self.entries.iter().map(|(id, entry)| (*id, &entry.axis))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AxisId, &mut Axis)> {
        self.entries.iter_mut().map(|(id, entry)| (*id, &mut entry.axis))
    }

    #[must_use]
    pub fn find_by_key(&self, key: &str) -> Option<AxisId> {
        self.iter()
            .find(|(_, axis)| axis.key() == Some(key))
            .map(|(id, _)| id)
    }

    #[must_use]
    pub fn is_default(&self, id: AxisId) -> bool {
        self.entries.get(&id).is_some_and(|entry| entry.is_default)
    }

    /// First axis that can serve `role` without being named.
    #[must_use]
    pub fn first_of_role(&self, role: AxisRole) -> Option<AxisId> {
        self.iter()
            .find(|(_, axis)| role.is_default_for(axis))
            .map(|(id, _)| id)
    }

    fn first_unkeyed_of_role(&self, role: AxisRole) -> Option<AxisId> {
        self.iter()
            .find(|(_, axis)| axis.key.is_none() && role.is_default_for(axis))
            .map(|(id, _)| id)
    }

    /// Resolves an axis key for `role`.
    ///
    /// A key that names no suitable axis falls back to the first unkeyed axis
    /// of the role. Without a key the first unkeyed axis of the role is
    /// preferred, then any axis of the role.
    #[must_use]
    pub fn resolve(&self, key: Option<&str>, role: AxisRole) -> Option<AxisId> {
        match key {
            Some(key) => {
                let keyed = self
                    .find_by_key(key)
                    .filter(|id| self.get(*id).is_some_and(|axis| role.accepts_keyed(axis)));
                if keyed.is_some() {
                    return keyed;
                }
                let fallback = self.first_unkeyed_of_role(role);
                if fallback.is_some() {
                    warn!(key, role = role.name(), "axis key not found, using the default axis");
                }
                fallback
            }
            None => self
                .first_unkeyed_of_role(role)
                .or_else(|| self.first_of_role(role)),
        }
    }

    /// Like [`AxisRegistry::resolve`], but reports a missing axis as an error.
    pub fn require(&self, key: Option<&str>, role: AxisRole) -> PlotResult<AxisId> {
        self.resolve(key, role).ok_or_else(|| PlotError::UnresolvedAxis {
            role: role.name(),
            key: key.map(str::to_owned),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_falls_back_to_unkeyed_axis() {
        let mut registry = AxisRegistry::default();
        let bottom = registry
            .add(Axis::linear(AxisPosition::Bottom))
            .expect("bottom");
        registry
            .add(Axis::linear(AxisPosition::Top).with_key("top"))
            .expect("top");
        assert_eq!(registry.resolve(Some("missing"), AxisRole::X), Some(bottom));
        assert_eq!(registry.resolve(None, AxisRole::Y), None);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut registry = AxisRegistry::default();
        registry
            .add(Axis::linear(AxisPosition::Left).with_key("y"))
            .expect("first");
        assert!(registry
            .add(Axis::linear(AxisPosition::Right).with_key("y"))
            .is_err());
    }

    #[test]
    fn user_axis_replaces_default_axis_of_same_role() {
        let mut registry = AxisRegistry::default();
        let default = registry.add_default(Axis::linear(AxisPosition::Bottom));
        let user = registry
            .add(Axis::linear(AxisPosition::Top))
            .expect("user axis");
        assert!(registry.get(default).is_none());
        assert_eq!(registry.first_of_role(AxisRole::X), Some(user));
    }
}
