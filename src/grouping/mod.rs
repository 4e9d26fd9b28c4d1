//! Cross-scan grouping of precursor features.
//!
//! The same labeled precursor is usually detected in several consecutive
//! scans, and its isotope peaks can also pass as separate features. Grouping
//! runs per source file in two phases:
//!
//! 1. [`merge_duplicates`] folds features with the same charge, m/z and
//!    retention time into the most intense observation.
//! 2. [`remove_harmonics`] sorts by m/z and drops features that sit on the
//!    isotope ladder of a lower-m/z feature of the same charge.

use std::collections::HashMap;

use log::debug;

use crate::constants::NEUTRON_MASS;
use crate::features::PrecursorFeature;
use crate::locator::Tolerance;


/// Isotope steps beyond which a lower feature is no longer considered
pub const MAX_ISOTOPE_STEPS: i64 = 5;

/// Parameters for feature grouping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupingParams {
    /// m/z tolerance for duplicate and isotope matching
    pub tolerance: Tolerance,
    /// Retention time tolerance in minutes
    pub rt_tolerance: f64,
}

impl Default for GroupingParams {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::Ppm(5.0),
            rt_tolerance: 0.5,
        }
    }
}

impl GroupingParams {
    fn rt_close(&self, a: &PrecursorFeature, b: &PrecursorFeature) -> bool {
        (f64::from(a.retention_time) - f64::from(b.retention_time)).abs() <= self.rt_tolerance
    }
}

/// Features grouped by source file, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureGroups {
    groups: Vec<(String, Vec<PrecursorFeature>)>,
    index: HashMap<String, usize>,
}

impl FeatureGroups {
    /// Create an empty set of groups
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of source files
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no file has been seen
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of features across all files
    pub fn num_features(&self) -> usize {
        self.groups.iter().map(|(_, g)| g.len()).sum()
    }

    /// Features of one file
    pub fn get(&self, source_file: &str) -> Option<&[PrecursorFeature]> {
        self.index
            .get(source_file)
            .map(|&i| self.groups[i].1.as_slice())
    }

    /// Iterate over `(file, features)` in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PrecursorFeature])> {
        self.groups
            .iter()
            .map(|(file, group)| (file.as_str(), group.as_slice()))
    }

    /// Flatten into one list, file by file
    pub fn into_features(self) -> Vec<PrecursorFeature> {
        self.groups.into_iter().flat_map(|(_, g)| g).collect()
    }

    fn group_mut(&mut self, source_file: &str) -> &mut Vec<PrecursorFeature> {
        let idx = match self.index.get(source_file) {
            Some(&idx) => idx,
            None => {
                self.groups.push((source_file.to_string(), Vec::new()));
                let idx = self.groups.len() - 1;
                self.index.insert(source_file.to_string(), idx);
                idx
            }
        };
        &mut self.groups[idx].1
    }

    fn groups_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<PrecursorFeature>)> {
        self.groups.iter_mut().map(|(file, g)| (file.as_str(), g))
    }
}

/// Merge one incoming feature into the kept features of its file.
///
/// Every kept feature with the same charge whose m/z is within the
/// tolerance of the incoming m/z and whose retention time is within the
/// RT tolerance is a hit. Hits take over the incoming values when the
/// incoming feature is more intense. Without a hit the feature is appended.
pub fn merge_feature(
    kept: &mut Vec<PrecursorFeature>,
    incoming: PrecursorFeature,
    params: &GroupingParams,
) {
    let window = params.tolerance.window(incoming.mz);
    let mut hit = false;

    for feature in kept.iter_mut() {
        if feature.charge != incoming.charge
            || (feature.mz - incoming.mz).abs() >= window
            || !params.rt_close(feature, &incoming)
        {
            continue;
        }
        hit = true;
        if incoming.intensity > feature.intensity {
            *feature = incoming.clone();
        }
    }

    if !hit {
        kept.push(incoming);
    }
}

/// Phase 1: fold duplicate observations into per-file groups
pub fn merge_duplicates<I>(features: I, params: &GroupingParams) -> FeatureGroups
where
    I: IntoIterator<Item = PrecursorFeature>,
{
    let mut groups = FeatureGroups::new();
    for feature in features {
        let kept = groups.group_mut(&feature.source_file);
        merge_feature(kept, feature, params);
    }
    groups
}

/// Phase 2: drop features on the isotope ladder of a lower feature.
///
/// The group ends up sorted by m/z. Returns the number of removed features.
pub fn remove_harmonics(group: &mut Vec<PrecursorFeature>, params: &GroupingParams) -> usize {
    group.sort_by(PrecursorFeature::cmp_mz);

    let before = group.len();
    let mut i = 1;
    while i < group.len() {
        if is_harmonic(group, i, params) {
            group.remove(i);
        } else {
            i += 1;
        }
    }
    before - group.len()
}

fn is_harmonic(group: &[PrecursorFeature], i: usize, params: &GroupingParams) -> bool {
    let cur = &group[i];
    let spacing = NEUTRON_MASS / f64::from(cur.charge.max(1));

    for prev in group[..i].iter().rev() {
        if prev.charge != cur.charge {
            continue;
        }
        let err = params.tolerance.window(prev.mz);
        let diff = cur.mz - prev.mz;
        if diff <= err {
            if params.rt_close(prev, cur) {
                return true;
            }
            continue;
        }

        let steps = (diff / spacing).round() as i64;
        if steps > MAX_ISOTOPE_STEPS {
            break;
        }
        let expected = prev.mz + steps as f64 * spacing;
        if (expected - cur.mz).abs() <= err && params.rt_close(prev, cur) {
            return true;
        }
    }
    false
}

/// Run both grouping phases over the features of any number of files
pub fn group_features<I>(features: I, params: &GroupingParams) -> FeatureGroups
where
    I: IntoIterator<Item = PrecursorFeature>,
{
    let mut groups = merge_duplicates(features, params);
    for (file, group) in groups.groups_mut() {
        let removed = remove_harmonics(group, params);
        if removed > 0 {
            debug!("{}: removed {} isotope harmonics", file, removed);
        }
    }
    groups
}
