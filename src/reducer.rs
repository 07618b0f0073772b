//! Grouping of per-scale tunings into the fewest keyboard tunings.

use log::debug;

use crate::tuning::Tuning;

/// Turns a sequence of per-scale [`Tuning`]s into the tunings sent to an instrument.
pub trait TuningReducer {
    /// `global_fill` provides the values of keys that no tuning of a group sets.
    fn reduce(&self, tunings: &[Tuning], global_fill: Option<&Tuning>) -> Vec<Tuning>;
}

/// Emits one tuning per input, only applying the global fill.
#[derive(Copy, Clone, Debug, Default)]
pub struct DirectTuningReducer;

impl TuningReducer for DirectTuningReducer {
    fn reduce(&self, tunings: &[Tuning], global_fill: Option<&Tuning>) -> Vec<Tuning> {
        tunings
            .iter()
            .map(|tuning| apply_fill(tuning.clone(), global_fill))
            .collect()
    }
}

/// Greedily merges consecutive tunings for as long as they do not disagree on any key.
///
/// # Examples
///
/// ```
/// # use tunemap::reducer::{MergeTuningReducer, TuningReducer};
/// # use tunemap::tuning::Tuning;
/// let mut lower = [None; 12];
/// lower[0] = Some(0.0);
/// lower[4] = Some(-13.69);
/// let mut upper = [None; 12];
/// upper[4] = Some(-13.69);
/// upper[7] = Some(1.96);
/// let mut pythagorean = [None; 12];
/// pythagorean[4] = Some(7.82);
///
/// let reduced = MergeTuningReducer::default().reduce(
///     &[
///         Tuning::new("lower", lower),
///         Tuning::new("upper", upper),
///         Tuning::new("pythagorean", pythagorean),
///     ],
///     None,
/// );
///
/// assert_eq!(reduced.len(), 2);
/// assert_eq!(reduced[0].name(), "lower + upper");
/// assert_eq!(reduced[0].completed_count(), 3);
/// assert_eq!(reduced[1].name(), "pythagorean");
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MergeTuningReducer {
    equality_tolerance: f64,
}

impl MergeTuningReducer {
    pub fn new(equality_tolerance: f64) -> Self {
        Self { equality_tolerance }
    }

    pub fn equality_tolerance(&self) -> f64 {
        self.equality_tolerance
    }
}

/// The default equality tolerance is 0.5 cents.
impl Default for MergeTuningReducer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TuningReducer for MergeTuningReducer {
    fn reduce(&self, tunings: &[Tuning], global_fill: Option<&Tuning>) -> Vec<Tuning> {
        if tunings.is_empty() {
            return Vec::new();
        }

        let (mut reduced, last_group) = tunings.iter().fold(
            (Vec::new(), Tuning::empty()),
            |(mut reduced, group), tuning| match group.merge(tuning, self.equality_tolerance) {
                Some(merged) => (reduced, merged),
                None => {
                    debug!(
                        "{} conflicts with {}, starting a new group",
                        tuning.name(),
                        group.name()
                    );
                    reduced.push(apply_fill(group, global_fill));
                    (reduced, tuning.clone())
                }
            },
        );
        reduced.push(apply_fill(last_group, global_fill));

        reduced
    }
}

fn apply_fill(tuning: Tuning, global_fill: Option<&Tuning>) -> Tuning {
    match global_fill {
        Some(global_fill) => tuning.fill(global_fill),
        None => tuning,
    }
}
