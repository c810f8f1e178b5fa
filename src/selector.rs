use crate::{bucket::ColorBucket, config::SelectionConfig};
use std::cmp::Ordering;

/// Bound on [`color_distance`] over all pairs of colors. A threshold above it admits nothing after the first pick.
pub const MAX_DISTANCE: f64 = 765.0;

/// Picks the highest scoring buckets while keeping them perceptually apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiversitySelector {
    config: SelectionConfig,
}

impl DiversitySelector {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// Rank the candidates in place and return up to `count` of them.
    ///
    /// A candidate is accepted when its distance to every color selected so far is at least the current threshold.
    /// The first pass uses the configured minimum distance. While colors are missing, the threshold is lowered by the
    /// relaxation step and the candidates not yet selected are scanned again, until the threshold is no longer above
    /// the floor. The result is in selection order, which is descending score within each pass.
    pub fn select(&self, candidates: &mut [ColorBucket], count: usize) -> Vec<ColorBucket> {
        if count == 0 || candidates.is_empty() {
            return Vec::new();
        }

        rank(candidates);

        let mut selected = Vec::with_capacity(count.min(candidates.len()));
        let mut taken = vec![false; candidates.len()];
        let mut threshold = self.config.min_distance;

        select_pass(candidates, &mut taken, &mut selected, count, threshold);
        log::debug!("selected {} colors at distance {}", selected.len(), threshold);

        let step = self.config.relax_step;

        // passes above the largest possible distance cannot add anything, so skip them
        if threshold > MAX_DISTANCE && step > 0.0 {
            let redundant = ((threshold - MAX_DISTANCE) / step).floor();
            threshold = (threshold - redundant * step).max(MAX_DISTANCE);
        }

        while selected.len() < count
            && selected.len() < candidates.len()
            && threshold > self.config.distance_floor
            && step > 0.0
        {
            let relaxed = threshold - step;
            if relaxed >= threshold {
                break;
            }
            threshold = relaxed;

            let before = selected.len();
            select_pass(candidates, &mut taken, &mut selected, count, threshold);
            log::trace!(
                "relaxed distance to {}, selected {} more colors",
                threshold,
                selected.len() - before
            );
        }

        selected
    }
}

/// Sort candidates by descending score. Ties go to the more frequent bucket, then to the lower RGB key, so equal
/// scores never leave the order up to the input.
pub fn rank(candidates: &mut [ColorBucket]) {
    candidates.sort_by(compare_candidates);
}

fn compare_candidates(lhs: &ColorBucket, rhs: &ColorBucket) -> Ordering {
    rhs.final_score()
        .total_cmp(&lhs.final_score())
        .then_with(|| rhs.frequency().cmp(&lhs.frequency()))
        .then_with(|| lhs.rgb().cmp(&rhs.rgb()))
}

fn select_pass(
    candidates: &[ColorBucket],
    taken: &mut [bool],
    selected: &mut Vec<ColorBucket>,
    count: usize,
    threshold: f64,
) {
    for (candidate, taken) in candidates.iter().zip(taken.iter_mut()) {
        if selected.len() >= count {
            return;
        }

        if *taken {
            continue;
        }

        let distinct = selected
            .iter()
            .all(|other: &ColorBucket| color_distance(candidate.rgb(), other.rgb()) >= threshold);

        if distinct {
            *taken = true;
            selected.push(*candidate);
        }
    }
}

/// Weighted euclidean ("redmean") distance approximating the perceived difference between two colors.
///
/// The red and blue weights shift with the average red level of the pair; green always weighs 4.
pub fn color_distance((r1, g1, b1): (u8, u8, u8), (r2, g2, b2): (u8, u8, u8)) -> f64 {
    let delta_red = r1 as f64 - r2 as f64;
    let delta_green = g1 as f64 - g2 as f64;
    let delta_blue = b1 as f64 - b2 as f64;

    let average_red = (r1 as f64 + r2 as f64) / 2.0;
    let weight_red = 2.0 + average_red / 256.0;
    let weight_green = 4.0;
    let weight_blue = 2.0 + (255.0 - average_red) / 256.0;

    let red = weight_red * delta_red * delta_red;
    let green = weight_green * delta_green * delta_green;
    let blue = weight_blue * delta_blue * delta_blue;

    (red + green + blue).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(rgb: (u8, u8, u8), score: f64) -> ColorBucket {
        let mut bucket = ColorBucket::new(rgb, 1);
        bucket.final_score = score;
        bucket
    }

    fn colors(selected: &[ColorBucket]) -> Vec<(u8, u8, u8)> {
        selected.iter().map(|bucket| bucket.rgb()).collect()
    }

    #[test]
    fn distance_between_black_and_white() {
        let distance = color_distance((0, 0, 0), (255, 255, 255));
        let expected = ((2.0 + 127.5 / 256.0 + 4.0 + 2.0 + 127.5 / 256.0) * 255.0f64 * 255.0).sqrt();

        assert!((distance - expected).abs() < 1e-9);
        assert!((distance - 764.9).abs() < 0.1);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_identity() {
        let (a, b) = ((30, 200, 90), (120, 15, 240));

        assert_eq!(color_distance(a, a), 0.0);
        assert!((color_distance(a, b) - color_distance(b, a)).abs() < 1e-9);
    }

    #[test]
    fn selects_in_descending_score_order() {
        let mut candidates = vec![
            candidate((0, 0, 255), 0.2),
            candidate((255, 0, 0), 0.9),
            candidate((0, 255, 0), 0.5),
        ];

        let selected = DiversitySelector::default().select(&mut candidates, 5);

        assert_eq!(colors(&selected), vec![(255, 0, 0), (0, 255, 0), (0, 0, 255)]);
    }

    #[test]
    fn near_duplicates_collapse_to_best_scoring() {
        // every pair is within distance 15 of each other
        let mut candidates = vec![
            candidate((100, 100, 100), 0.3),
            candidate((103, 100, 100), 0.8),
            candidate((100, 103, 100), 0.5),
            candidate((100, 100, 103), 0.4),
            candidate((103, 103, 100), 0.1),
        ];

        let selected = DiversitySelector::default().select(&mut candidates, 5);

        assert_eq!(colors(&selected), vec![(103, 100, 100)]);
    }

    #[test]
    fn relaxation_admits_moderately_close_colors() {
        // (0, 0, 0) and (0, 15, 0) are 30 apart: rejected at 40, accepted at 30
        let mut candidates = vec![candidate((0, 0, 0), 1.0), candidate((0, 15, 0), 0.5)];

        let selected = DiversitySelector::default().select(&mut candidates, 2);

        assert_eq!(colors(&selected), vec![(0, 0, 0), (0, 15, 0)]);
    }

    #[test]
    fn relaxation_goes_down_to_the_floor() {
        // 20 apart on the green axis
        let mut candidates = vec![candidate((0, 0, 0), 1.0), candidate((0, 10, 0), 0.5)];

        let selected = DiversitySelector::default().select(&mut candidates, 2);

        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn later_passes_append_after_earlier_picks() {
        let mut candidates = vec![
            candidate((255, 0, 0), 1.0),
            candidate((240, 0, 0), 0.9),
            candidate((0, 0, 255), 0.8),
            candidate((0, 15, 255), 0.7),
        ];

        let selected = DiversitySelector::default().select(&mut candidates, 4);

        // (0, 15, 255) is 30 from (0, 0, 255), (240, 0, 0) is about 25.8 from (255, 0, 0)
        assert_eq!(
            colors(&selected),
            vec![(255, 0, 0), (0, 0, 255), (0, 15, 255), (240, 0, 0)]
        );
    }

    #[test]
    fn never_selects_more_than_requested() {
        let mut candidates = (0..10).map(|i| candidate((i * 25, 0, 255 - i * 25), i as f64)).collect::<Vec<_>>();

        let selected = DiversitySelector::default().select(&mut candidates, 3);

        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn black_and_white_are_within_the_distance_bound() {
        let distance = color_distance((0, 0, 0), (255, 255, 255));

        assert!(distance < MAX_DISTANCE);
        assert!(distance > MAX_DISTANCE - 1.0);
    }

    #[test]
    fn huge_min_distance_still_relaxes_to_the_floor() {
        let selector = DiversitySelector::new(SelectionConfig {
            min_distance: 1e20,
            relax_step: 5.0,
            distance_floor: 20.0,
        });
        let mut candidates = vec![candidate((0, 0, 0), 2.0), candidate((255, 255, 255), 1.0)];

        let selected = selector.select(&mut candidates, 2);

        assert_eq!(selected.iter().map(ColorBucket::rgb).collect::<Vec<_>>(), vec![(0, 0, 0), (255, 255, 255)]);
    }

    #[test]
    fn relaxation_stops_when_the_step_vanishes() {
        let selector = DiversitySelector::new(SelectionConfig {
            min_distance: 100.0,
            relax_step: 1e-300,
            distance_floor: 20.0,
        });
        let mut candidates = vec![candidate((255, 0, 0), 2.0), candidate((240, 0, 0), 1.0)];

        assert_eq!(selector.select(&mut candidates, 2).len(), 1);
    }

    #[test]
    fn zero_count_or_no_candidates_select_nothing() {
        let mut candidates = vec![candidate((255, 0, 0), 1.0)];

        assert!(DiversitySelector::default().select(&mut candidates, 0).is_empty());
        assert!(DiversitySelector::default().select(&mut [], 5).is_empty());
    }

    #[test]
    fn selected_colors_are_never_closer_than_the_floor() {
        let mut candidates = (0..18u8)
            .flat_map(|r| (0..18u8).map(move |g| (r, g)))
            .map(|(r, g)| candidate((r * 15, g * 15, 120), (r as f64 * 7.0 + g as f64) % 11.0))
            .collect::<Vec<_>>();

        let selected = DiversitySelector::default().select(&mut candidates, 12);

        for (i, lhs) in selected.iter().enumerate() {
            for rhs in &selected[i + 1..] {
                assert!(color_distance(lhs.rgb(), rhs.rgb()) >= 20.0);
            }
        }
    }

    #[test]
    fn ties_break_by_frequency_then_key() {
        let mut candidates = vec![
            ColorBucket::new((0, 0, 255), 5),
            ColorBucket::new((255, 0, 0), 5),
            ColorBucket::new((0, 255, 0), 9),
        ];

        rank(&mut candidates);

        assert_eq!(
            candidates.iter().map(|bucket| bucket.rgb()).collect::<Vec<_>>(),
            vec![(0, 255, 0), (0, 0, 255), (255, 0, 0)]
        );
    }
}
