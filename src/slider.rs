//! Slider segments and the observations made on them.

/// Scale applied to the segment between the chosen ends when enlarging.
const ENLARGE_SCALE: f64 = 1.25;
/// Minimum length of an enlarged slider (before clipping to the unit box).
const MIN_SLIDER_LENGTH: f64 = 0.25;

/// A 1-D segment through the search space, shown to the user as a slider.
///
/// `orig_0` and `orig_1` are the ends picked by the acquisition step.
/// `end_0` and `end_1` are the ends actually presented: either the same
/// points, or an enlarged segment around them that stays inside `[0, 1]^D`
/// and always contains both original ends.
#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    orig_0: Vec<f64>,
    orig_1: Vec<f64>,
    end_0: Vec<f64>,
    end_1: Vec<f64>,
}

impl Slider {
    /// Creates a slider between two points of equal length, optionally
    /// enlarging it.
    ///
    /// Enlarging scales the segment by 1.25 about its centre, stretches it
    /// to a length of at least 0.25, and then pulls each end back toward
    /// the centre until it lies inside the unit box.
    #[must_use]
    pub fn new(end_0: Vec<f64>, end_1: Vec<f64>, enlarge: bool) -> Self {
        if !enlarge {
            return Self {
                orig_0: end_0.clone(),
                orig_1: end_1.clone(),
                end_0,
                end_1,
            };
        }

        let center: Vec<f64> = end_0.iter().zip(&end_1).map(|(a, b)| 0.5 * (a + b)).collect();
        let mut half: Vec<f64> = end_0
            .iter()
            .zip(&end_1)
            .map(|(a, b)| ENLARGE_SCALE * 0.5 * (b - a))
            .collect();

        let half_len = norm(&half);
        let min_half = 0.5 * MIN_SLIDER_LENGTH;
        if half_len > 0.0 && half_len < min_half {
            let scale = min_half / half_len;
            for h in &mut half {
                *h *= scale;
            }
        }

        let negated: Vec<f64> = half.iter().map(|h| -h).collect();
        let s0 = box_reach(&center, &negated);
        let s1 = box_reach(&center, &half);

        let enlarged_0 = center
            .iter()
            .zip(&half)
            .map(|(c, h)| (c - s0 * h).clamp(0.0, 1.0))
            .collect();
        let enlarged_1 = center
            .iter()
            .zip(&half)
            .map(|(c, h)| (c + s1 * h).clamp(0.0, 1.0))
            .collect();

        Self {
            orig_0: end_0,
            orig_1: end_1,
            end_0: enlarged_0,
            end_1: enlarged_1,
        }
    }

    /// The point at position `t` along the slider: `end_0·(1−t) + end_1·t`.
    ///
    /// `t = 0` returns exactly `end_0` and `t = 1` exactly `end_1`. The
    /// caller is responsible for keeping `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Vec<f64> {
        self.end_0
            .iter()
            .zip(&self.end_1)
            .map(|(a, b)| a * (1.0 - t) + b * t)
            .collect()
    }

    /// The end presented at slider position 0.
    #[must_use]
    pub fn end_0(&self) -> &[f64] {
        &self.end_0
    }

    /// The end presented at slider position 1.
    #[must_use]
    pub fn end_1(&self) -> &[f64] {
        &self.end_1
    }

    /// The first end chosen by the acquisition step (before enlarging).
    #[must_use]
    pub fn orig_0(&self) -> &[f64] {
        &self.orig_0
    }

    /// The second end chosen by the acquisition step (before enlarging).
    #[must_use]
    pub fn orig_1(&self) -> &[f64] {
        &self.orig_1
    }

    /// Euclidean length of the presented segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        let diff: Vec<f64> = self.end_1.iter().zip(&self.end_0).map(|(b, a)| b - a).collect();
        norm(&diff)
    }
}

/// Largest `s` in `[0, 1]` such that `center + s·dir` stays inside the unit box.
fn box_reach(center: &[f64], dir: &[f64]) -> f64 {
    let mut s: f64 = 1.0;
    for (&c, &d) in center.iter().zip(dir) {
        if d > 0.0 {
            s = s.min((1.0 - c) / d);
        } else if d < 0.0 {
            s = s.min(-c / d);
        }
    }
    s.max(0.0)
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// One user judgement: the position picked on a slider.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    slider: Slider,
    position: f64,
}

impl Observation {
    pub(crate) fn new(slider: Slider, position: f64) -> Self {
        Self { slider, position }
    }

    /// The slider the judgement was made on.
    #[must_use]
    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    /// The picked slider position in `[0, 1]`.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// The picked point in parameter space.
    #[must_use]
    pub fn chosen_point(&self) -> Vec<f64> {
        self.slider.point_at(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_segment(p: &[f64], a: &[f64], b: &[f64]) -> bool {
        // p = a + t (b - a) for a single t in [0, 1]
        let ab: Vec<f64> = b.iter().zip(a).map(|(x, y)| x - y).collect();
        let ap: Vec<f64> = p.iter().zip(a).map(|(x, y)| x - y).collect();
        let len_sq: f64 = ab.iter().map(|x| x * x).sum();
        let t = ab.iter().zip(&ap).map(|(x, y)| x * y).sum::<f64>() / len_sq;
        let residual: f64 = ap
            .iter()
            .zip(&ab)
            .map(|(x, y)| (x - t * y).powi(2))
            .sum::<f64>()
            .sqrt();
        (-1e-9..=1.0 + 1e-9).contains(&t) && residual < 1e-9
    }

    #[test]
    fn test_slider_without_enlarge_keeps_ends() {
        let s = Slider::new(vec![0.2, 0.3], vec![0.6, 0.7], false);
        assert_eq!(s.end_0(), &[0.2, 0.3]);
        assert_eq!(s.end_1(), &[0.6, 0.7]);
        assert_eq!(s.orig_0(), s.end_0());
    }

    #[test]
    fn test_point_at_boundaries_are_exact() {
        let s = Slider::new(vec![0.1, 0.2, 0.3], vec![0.7, 0.4, 0.9], true);
        assert_eq!(s.point_at(0.0), s.end_0().to_vec());
        assert_eq!(s.point_at(1.0), s.end_1().to_vec());
    }

    #[test]
    fn test_point_at_midpoint() {
        let s = Slider::new(vec![0.0, 0.0], vec![1.0, 0.5], false);
        let p = s.point_at(0.5);
        assert!((p[0] - 0.5).abs() < 1e-15);
        assert!((p[1] - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_enlarged_slider_contains_original_ends() {
        let a = vec![0.3, 0.4, 0.5];
        let b = vec![0.6, 0.5, 0.55];
        let s = Slider::new(a.clone(), b.clone(), true);
        assert!(on_segment(&a, s.end_0(), s.end_1()));
        assert!(on_segment(&b, s.end_0(), s.end_1()));
        assert!(s.length() > norm(&[0.3, 0.1, 0.05]));
    }

    #[test]
    fn test_enlarged_slider_stays_in_unit_box() {
        let s = Slider::new(vec![0.0, 0.05], vec![0.95, 1.0], true);
        for v in s.end_0().iter().chain(s.end_1()) {
            assert!((0.0..=1.0).contains(v), "end component {v} outside [0, 1]");
        }
        assert!(on_segment(&[0.0, 0.05], s.end_0(), s.end_1()));
    }

    #[test]
    fn test_short_slider_gets_minimum_length() {
        let s = Slider::new(vec![0.5, 0.5], vec![0.51, 0.5], true);
        assert!((s.length() - MIN_SLIDER_LENGTH).abs() < 1e-12);
    }

    #[test]
    fn test_observation_chosen_point() {
        let s = Slider::new(vec![0.0], vec![1.0], false);
        let obs = Observation::new(s, 0.25);
        assert!((obs.chosen_point()[0] - 0.25).abs() < 1e-15);
        assert!((obs.position() - 0.25).abs() < f64::EPSILON);
    }
}
