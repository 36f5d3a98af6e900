// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! Component identification - mapping three raw channels to H1/H2/V roles
//!
//! Filename-suffix matching runs first; roles left open afterwards are filled
//! by RMS energy ranking (vertical ground motion is typically weaker than
//! horizontal, so the lowest-energy leftover becomes V).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuakeError, Result};

/// Canonical role of one channel within a triaxial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentRole {
    /// First horizontal component
    H1,
    /// Second horizontal component
    H2,
    /// Vertical component
    V,
}

impl ComponentRole {
    /// All roles, in the order used for RMS fallback filling (V first).
    pub const FALLBACK_ORDER: [ComponentRole; 3] =
        [ComponentRole::V, ComponentRole::H1, ComponentRole::H2];

    /// Short label as used in summaries and traces.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentRole::H1 => "H1",
            ComponentRole::H2 => "H2",
            ComponentRole::V => "V",
        }
    }
}

impl fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed three-slot container holding one value per component role.
///
/// Role completeness is structural: a `ComponentSet` cannot exist with a
/// missing slot, so downstream stages never re-check coverage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentSet<T> {
    /// Value for the first horizontal component
    pub h1: T,
    /// Value for the second horizontal component
    pub h2: T,
    /// Value for the vertical component
    pub v: T,
}

impl<T> ComponentSet<T> {
    /// Borrow the slot for `role`.
    pub fn get(&self, role: ComponentRole) -> &T {
        match role {
            ComponentRole::H1 => &self.h1,
            ComponentRole::H2 => &self.h2,
            ComponentRole::V => &self.v,
        }
    }

    /// Mutably borrow the slot for `role`.
    pub fn get_mut(&mut self, role: ComponentRole) -> &mut T {
        match role {
            ComponentRole::H1 => &mut self.h1,
            ComponentRole::H2 => &mut self.h2,
            ComponentRole::V => &mut self.v,
        }
    }

    /// Iterate `(role, value)` pairs in H1, H2, V order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentRole, &T)> {
        [
            (ComponentRole::H1, &self.h1),
            (ComponentRole::H2, &self.h2),
            (ComponentRole::V, &self.v),
        ]
        .into_iter()
    }

    /// Apply `f` to every slot, producing a new set.
    pub fn map<U>(&self, mut f: impl FnMut(ComponentRole, &T) -> U) -> ComponentSet<U> {
        ComponentSet {
            h1: f(ComponentRole::H1, &self.h1),
            h2: f(ComponentRole::H2, &self.h2),
            v: f(ComponentRole::V, &self.v),
        }
    }
}

// Suffix conventions checked against the uppercased file stem. Longer tokens
// first so "NS" wins over "S"-less single letters.
const H1_SUFFIXES: [&str; 4] = ["H1", "NS", "N", "X"];
const H2_SUFFIXES: [&str; 4] = ["H2", "EW", "E", "Y"];
const V_SUFFIXES: [&str; 6] = ["UD", "UP", "VRT", "VER", "Z", "V"];

fn suffix_role(name: &str) -> Option<ComponentRole> {
    let stem = match name.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => name,
    };
    let stem = stem.to_uppercase();

    for token in H1_SUFFIXES {
        if stem.ends_with(token) {
            return Some(ComponentRole::H1);
        }
    }
    for token in H2_SUFFIXES {
        if stem.ends_with(token) {
            return Some(ComponentRole::H2);
        }
    }
    for token in V_SUFFIXES {
        if stem.ends_with(token) {
            return Some(ComponentRole::V);
        }
    }
    None
}

fn rms(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.iter().map(|&x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
}

/// Identifies the H1, H2, and V components in a set of exactly three signals.
pub struct ComponentIdentifier;

impl ComponentIdentifier {
    /// Assign the three raw channels to their canonical roles.
    ///
    /// Returns the role-keyed signals together with a role -> source-file map
    /// kept for traceability.
    pub fn identify(
        signals: &BTreeMap<String, Vec<f64>>,
    ) -> Result<(ComponentSet<Vec<f64>>, ComponentSet<String>)> {
        if signals.len() != 3 {
            return Err(QuakeError::ComponentCount {
                count: signals.len(),
            });
        }

        let mut assigned: [Option<&String>; 3] = [None, None, None];
        let slot = |role: ComponentRole| match role {
            ComponentRole::H1 => 0,
            ComponentRole::H2 => 1,
            ComponentRole::V => 2,
        };

        // Pass 1: filename suffix conventions.
        for name in signals.keys() {
            if let Some(role) = suffix_role(name) {
                let idx = slot(role);
                if let Some(prev) = assigned[idx] {
                    return Err(QuakeError::DuplicateComponent {
                        role: role.to_string(),
                        first: prev.clone(),
                        second: name.clone(),
                    });
                }
                assigned[idx] = Some(name);
                debug!("component {} matched by suffix: {}", role, name);
            }
        }

        // Pass 2: RMS ranking among the leftovers, lowest energy first.
        let mut leftovers: Vec<(&String, f64)> = signals
            .iter()
            .filter(|(name, _)| !assigned.iter().flatten().any(|&a| a == *name))
            .map(|(name, sig)| (name, rms(sig)))
            .collect();
        leftovers.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut leftovers = leftovers.into_iter();
        for role in ComponentRole::FALLBACK_ORDER {
            let idx = slot(role);
            if assigned[idx].is_none() {
                match leftovers.next() {
                    Some((name, energy)) => {
                        assigned[idx] = Some(name);
                        debug!("component {} filled by RMS fallback: {} (rms {:.4e})", role, name, energy);
                    }
                    None => return Err(QuakeError::IncompleteComponents),
                }
            }
        }

        let name_of = |idx: usize| -> Result<&String> {
            assigned[idx].ok_or(QuakeError::IncompleteComponents)
        };
        let h1 = name_of(0)?;
        let h2 = name_of(1)?;
        let v = name_of(2)?;

        let set = ComponentSet {
            h1: signals[h1].clone(),
            h2: signals[h2].clone(),
            v: signals[v].clone(),
        };
        let names = ComponentSet {
            h1: h1.clone(),
            h2: h2.clone(),
            v: v.clone(),
        };
        Ok((set, names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entries: &[(&str, Vec<f64>)]) -> BTreeMap<String, Vec<f64>> {
        entries
            .iter()
            .map(|(name, sig)| (name.to_string(), sig.clone()))
            .collect()
    }

    #[test]
    fn suffix_match_covers_all_roles() {
        // RMS ordering deliberately disagrees with the suffixes: the vertical
        // file carries the strongest signal.
        let signals = record(&[
            ("STAT_NS.AT2", vec![0.1; 100]),
            ("STAT_EW.AT2", vec![0.2; 100]),
            ("STAT_UD.AT2", vec![5.0; 100]),
        ]);
        let (set, names) = ComponentIdentifier::identify(&signals).unwrap();
        assert_eq!(names.h1, "STAT_NS.AT2");
        assert_eq!(names.h2, "STAT_EW.AT2");
        assert_eq!(names.v, "STAT_UD.AT2");
        assert_eq!(set.v[0], 5.0);
    }

    #[test]
    fn rms_fallback_picks_weakest_as_vertical() {
        let signals = record(&[
            ("A.AT2", vec![1.0; 100]),
            ("B.AT2", vec![0.01; 100]),
            ("C.AT2", vec![0.5; 100]),
        ]);
        let (_, names) = ComponentIdentifier::identify(&signals).unwrap();
        assert_eq!(names.v, "B.AT2");
        assert_eq!(names.h1, "C.AT2");
        assert_eq!(names.h2, "A.AT2");
    }

    #[test]
    fn mixed_suffix_and_fallback() {
        // Only the vertical channel is named by convention; the two leftovers
        // split H1/H2 by ascending RMS.
        let signals = record(&[
            ("REC_1.AT2", vec![2.0; 50]),
            ("REC_2Q.AT2", vec![0.7; 50]),
            ("REC_UD.AT2", vec![3.0; 50]),
        ]);
        let (_, names) = ComponentIdentifier::identify(&signals).unwrap();
        assert_eq!(names.v, "REC_UD.AT2");
        assert_eq!(names.h1, "REC_2Q.AT2");
        assert_eq!(names.h2, "REC_1.AT2");
    }

    #[test]
    fn wrong_channel_count_is_fatal() {
        let signals = record(&[("A.AT2", vec![1.0]), ("B.AT2", vec![1.0])]);
        assert!(matches!(
            ComponentIdentifier::identify(&signals),
            Err(QuakeError::ComponentCount { count: 2 })
        ));
    }

    #[test]
    fn duplicate_suffix_role_is_fatal() {
        let signals = record(&[
            ("STAT_NS.AT2", vec![1.0; 10]),
            ("OTHER_N.AT2", vec![1.0; 10]),
            ("STAT_UD.AT2", vec![1.0; 10]),
        ]);
        assert!(matches!(
            ComponentIdentifier::identify(&signals),
            Err(QuakeError::DuplicateComponent { .. })
        ));
    }
}
