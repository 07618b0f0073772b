use log::debug;

use super::auto::DegreeMapping;

/// Controls how tetrachords containing an augmented second are notated when their inner degrees are quarter tones.
///
/// A window of four consecutive, non-overridden degrees is a candidate when its middle step is strictly wider than both outer steps.
/// The inner degrees may then be moved to their other key so that the 12-EDO steps of the window form the expected figure.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SoftChromaticGenusMapping {
    /// Degrees are mapped individually.
    #[default]
    Off,
    /// Only accept the semitone steps `1, 3, 1`.
    Strict,
    /// Accept an augmented second surrounded by semitones or whole tones, i.e. `1, 3, 1`, `1, 3, 2` or `2, 3, 1`.
    PseudoChromatic,
}

impl SoftChromaticGenusMapping {
    fn matches(self, steps: (i32, i32, i32)) -> bool {
        match self {
            SoftChromaticGenusMapping::Off => false,
            SoftChromaticGenusMapping::Strict => steps == (1, 3, 1),
            SoftChromaticGenusMapping::PseudoChromatic => {
                matches!(steps, (1, 3, 1) | (1, 3, 2) | (2, 3, 1))
            }
        }
    }

    /// Scans the degrees from bottom to top and moves inner quarter tones of each genus window if this produces a matching figure.
    pub(super) fn apply(self, degree_mappings: &mut [DegreeMapping]) {
        if self == SoftChromaticGenusMapping::Off {
            return;
        }

        for start in 0..degree_mappings.len().saturating_sub(3) {
            let window = &degree_mappings[start..start + 4];
            if !is_genus_candidate(window) {
                continue;
            }

            let [a, b, c, d] = [0, 1, 2, 3].map(|index| &window[index]);
            let options_of = |mapping: &DegreeMapping| {
                [Some(mapping.semitones), mapping.alternative]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
            };
            let b_options = options_of(b);
            let c_options = options_of(c);

            let chosen = b_options.iter().find_map(|&b_semitones| {
                c_options
                    .iter()
                    .map(|&c_semitones| (b_semitones, c_semitones))
                    .find(|&(b_semitones, c_semitones)| {
                        self.matches((
                            b_semitones - a.semitones,
                            c_semitones - b_semitones,
                            d.semitones - c_semitones,
                        ))
                    })
            });

            if let Some((b_semitones, c_semitones)) = chosen {
                for (offset, semitones) in [(1, b_semitones), (2, c_semitones)] {
                    let mapping = &mut degree_mappings[start + offset];
                    if mapping.semitones != semitones {
                        let from = mapping.pitch_class();
                        mapping.relocate();
                        debug!(
                            "Moved degree {} from {} to {} to form a soft chromatic genus",
                            mapping.degree,
                            from,
                            mapping.pitch_class()
                        );
                    }
                }
            }
        }
    }
}

fn is_genus_candidate(window: &[DegreeMapping]) -> bool {
    let consecutive = window
        .windows(2)
        .all(|pair| pair[1].degree == pair[0].degree + 1);
    if !consecutive || window.iter().any(|mapping| mapping.is_forced) {
        return false;
    }

    let step = |lower: &DegreeMapping, upper: &DegreeMapping| {
        upper.absolute_cents - lower.absolute_cents
    };
    let lower_step = step(&window[0], &window[1]);
    let middle_step = step(&window[1], &window[2]);
    let upper_step = step(&window[2], &window[3]);

    middle_step > lower_step && middle_step > upper_step
}
