// Copyright (c) 2006 Simon Brown <si@sjbrown.co.uk>
// Copyright (c) 2018-2021 Jan Solanti <jhs@psonet.com>
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to	deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
// OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use super::range::RangeFit;
use super::{assignment_error, Candidate, Codebook};
use crate::colourset::ColourSet;
use crate::math::Vec3;
use crate::simd::Vec4;

/// Upper bound on the orderings tried by the iterative variant
const MAX_ITERATIONS: usize = 8;

const ZERO: Vec4 = Vec4::splat(0.0);
const ONE: Vec4 = Vec4::splat(1.0);
const TWO: Vec4 = Vec4::splat(2.0);
const HALF: Vec4 = Vec4::splat(0.5);
const GRID: Vec4 = Vec4::new(31.0, 63.0, 31.0, 0.0);
const GRID_RCP: Vec4 = Vec4::new(1.0 / 31.0, 1.0 / 63.0, 1.0 / 31.0, 0.0);

/// The best split of the ordered points found so far
#[derive(Clone, Copy)]
struct Partition {
    start: Vec4,
    end: Vec4,
    error: Vec4,
    // cluster boundaries in the ordered point list
    splits: [usize; 3],
    iteration: usize,
}

/// Least-squares endpoint fit over every split of the points ordered along
/// the principal axis into 3 or 4 contiguous clusters.
pub struct ClusterFit<'a> {
    colours: &'a ColourSet,
    range: RangeFit<'a>,
    iterations: usize,
    metric: Vec4,
    orders: [[u8; 16]; MAX_ITERATIONS],
    points_weights: [Vec4; 16],
    xsum_wsum: Vec4,
}

impl<'a> ClusterFit<'a> {
    pub fn new(colours: &'a ColourSet, metric: Vec3, iterate: bool) -> Self {
        ClusterFit {
            colours,
            range: RangeFit::new(colours, metric),
            iterations: if iterate { MAX_ITERATIONS } else { 1 },
            metric: Vec4::new(metric.x(), metric.y(), metric.z(), 0.0),
            orders: [[0; 16]; MAX_ITERATIONS],
            points_weights: [ZERO; 16],
            xsum_wsum: ZERO,
        }
    }

    pub fn colours(&self) -> &'a ColourSet {
        self.colours
    }

    pub fn is_iterative(&self) -> bool {
        self.iterations > 1
    }

    /// Sorts the points along `axis` into ordering number `iteration` and
    /// refreshes the weighted prefix data. Returns false if this ordering was
    /// already tried.
    fn construct_ordering(&mut self, axis: &Vec3, iteration: usize) -> bool {
        let colours = self.colours;
        let count = colours.count();
        let points = colours.points();
        let weights = colours.weights();

        // build the list of dot products
        let mut dps = [0f32; 16];
        let order = &mut self.orders[iteration];
        for (i, point) in points.iter().enumerate() {
            dps[i] = point.dot(axis);
            order[i] = i as u8;
        }

        // stable insertion sort
        for i in 1..count {
            let mut j = i;
            while j > 0 && dps[j] < dps[j - 1] {
                dps.swap(j, j - 1);
                order.swap(j, j - 1);
                j -= 1;
            }
        }

        // check this ordering is unique
        let order = self.orders[iteration];
        if self.orders[..iteration].iter().any(|previous| previous[..count] == order[..count]) {
            return false;
        }

        // copy the ordering and weight all the points
        self.xsum_wsum = ZERO;
        for (i, &index) in order[..count].iter().enumerate() {
            let point = points[index as usize];
            let weight = weights[index as usize];
            let x = Vec4::new(point.x(), point.y(), point.z(), 1.0);
            let w = Vec4::splat(weight);
            self.points_weights[i] = w * x;
            self.xsum_wsum += self.points_weights[i];
        }
        true
    }

    /// Solves for the endpoints of one split given the summed interpolation
    /// weights, returning the grid-snapped endpoints and the algebraic error.
    #[inline]
    fn solve(&self, alphax_sum: Vec4, betax_sum: Vec4, alphabeta_sum: Vec4) -> (Vec4, Vec4, Vec4) {
        let alpha2_sum = alphax_sum.splat_w();
        let beta2_sum = betax_sum.splat_w();

        // compute the least-squares optimal points
        let factor =
            Vec4::negative_multiply_subtract(alphabeta_sum, alphabeta_sum, alpha2_sum * beta2_sum)
                .reciprocal();
        let mut a = Vec4::negative_multiply_subtract(betax_sum, alphabeta_sum, alphax_sum * beta2_sum)
            * factor;
        let mut b = Vec4::negative_multiply_subtract(alphax_sum, alphabeta_sum, betax_sum * alpha2_sum)
            * factor;

        // clamp to the grid
        a = ONE.min(ZERO.max(a));
        b = ONE.min(ZERO.max(b));
        a = Vec4::multiply_add(GRID, a, HALF).truncate() * GRID_RCP;
        b = Vec4::multiply_add(GRID, b, HALF).truncate() * GRID_RCP;

        // compute the error (we skip the constant xxsum)
        let e1 = Vec4::multiply_add(a * a, alpha2_sum, b * b * beta2_sum);
        let e2 = Vec4::negative_multiply_subtract(a, alphax_sum, a * b * alphabeta_sum);
        let e3 = Vec4::negative_multiply_subtract(b, betax_sum, e2);
        let e4 = Vec4::multiply_add(TWO, e3, e1);

        // apply the metric to the error term
        let e5 = e4 * self.metric;
        let error = e5.splat_x() + e5.splat_y() + e5.splat_z();

        (a, b, error)
    }

    /// Tries every split into start, midpoint and end clusters
    fn search3(&self, best: &mut Partition, iteration: usize) {
        let count = self.colours.count();
        let half_half2 = Vec4::new(0.5, 0.5, 0.5, 0.25);
        let quarter = Vec4::splat(0.25);

        let mut part0 = ZERO;
        for i in 0..count {
            // the first cluster is empty only when the second is not
            let mut part1 = if i == 0 { self.points_weights[0] } else { ZERO };
            let jmin = if i == 0 { 1 } else { i };
            for j in jmin..=count {
                // the last cluster takes what is left
                let part2 = self.xsum_wsum - part1 - part0;

                let alphax_sum = Vec4::multiply_add(part1, half_half2, part0);
                let betax_sum = Vec4::multiply_add(part1, half_half2, part2);
                let alphabeta_sum = part1.splat_w() * quarter;

                let (a, b, error) = self.solve(alphax_sum, betax_sum, alphabeta_sum);
                if error.any_less_than(best.error) {
                    *best = Partition {
                        start: a,
                        end: b,
                        error,
                        splits: [i, j, j],
                        iteration,
                    };
                }

                if j < count {
                    part1 += self.points_weights[j];
                }
            }
            part0 += self.points_weights[i];
        }
    }

    /// Tries every split into start, 1/3, 2/3 and end clusters
    fn search4(&self, best: &mut Partition, iteration: usize) {
        let count = self.colours.count();
        let onethird_onethird2 = Vec4::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 9.0);
        let twothirds_twothirds2 = Vec4::new(2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 4.0 / 9.0);
        let twonineths = Vec4::splat(2.0 / 9.0);

        let mut part0 = ZERO;
        for i in 0..count {
            let mut part1 = ZERO;
            for j in i..=count {
                let mut part2 = if j == 0 { self.points_weights[0] } else { ZERO };
                let kmin = if j == 0 { 1 } else { j };
                for k in kmin..=count {
                    let part3 = self.xsum_wsum - part2 - part1 - part0;

                    let alphax_sum = Vec4::multiply_add(
                        part2,
                        onethird_onethird2,
                        Vec4::multiply_add(part1, twothirds_twothirds2, part0),
                    );
                    let betax_sum = Vec4::multiply_add(
                        part1,
                        onethird_onethird2,
                        Vec4::multiply_add(part2, twothirds_twothirds2, part3),
                    );
                    let alphabeta_sum = twonineths * (part1 + part2).splat_w();

                    let (a, b, error) = self.solve(alphax_sum, betax_sum, alphabeta_sum);
                    if error.any_less_than(best.error) {
                        *best = Partition {
                            start: a,
                            end: b,
                            error,
                            splits: [i, j, k],
                            iteration,
                        };
                    }

                    if k < count {
                        part2 += self.points_weights[k];
                    }
                }

                if j < count {
                    part1 += self.points_weights[j];
                }
            }
            part0 += self.points_weights[i];
        }
    }

    pub fn fit(&mut self, codebook: Codebook) -> Candidate {
        // the range fit is both the starting axis and the baseline to beat
        let baseline = self.range.fit(codebook);
        let count = self.colours.count();
        if count == 0 {
            return baseline;
        }

        let axis = self.range.principle();
        self.construct_ordering(&axis, 0);

        let mut best = Partition {
            start: ZERO,
            end: ZERO,
            error: Vec4::splat(f32::MAX),
            splits: [0; 3],
            iteration: 0,
        };

        let mut iteration = 0;
        loop {
            match codebook {
                Codebook::Three => self.search3(&mut best, iteration),
                Codebook::Four => self.search4(&mut best, iteration),
            }

            // stop if this ordering brought no improvement
            if best.iteration != iteration {
                break;
            }

            // stop at the iteration limit or on a repeated ordering
            iteration += 1;
            if iteration == self.iterations {
                break;
            }
            let axis = (best.end - best.start).to_vec3();
            if !self.construct_ordering(&axis, iteration) {
                break;
            }
        }

        if best.error.x() == f32::MAX {
            return baseline;
        }

        // unpack the cluster boundaries into per-point indices
        let [i, j, k] = best.splits;
        let labels = match codebook {
            Codebook::Three => [0, 2, 2, 1],
            Codebook::Four => [0, 2, 3, 1],
        };
        let order = &self.orders[best.iteration];
        let mut unordered = [0u8; 16];
        for (m, &index) in order[..count].iter().enumerate() {
            let cluster = if m < i {
                0
            } else if m < j {
                1
            } else if m < k {
                2
            } else {
                3
            };
            unordered[index as usize] = labels[cluster];
        }

        let start = best.start.to_vec3();
        let end = best.end.to_vec3();
        let (codes, _) = codebook.colours(start, end);
        let error = assignment_error(
            self.colours.points(),
            self.colours.weights(),
            self.metric.to_vec3(),
            &codes,
            &unordered[..count],
        );

        if error < baseline.error {
            Candidate {
                codebook,
                start,
                end,
                indices: self.colours.remap_indices(&unordered),
                error,
            }
        } else {
            baseline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{COLOUR_WEIGHTS_PERCEPTUAL, COLOUR_WEIGHTS_UNIFORM};

    /// Small deterministic generator so failures reproduce
    struct Lcg(u32);

    impl Lcg {
        fn next(&mut self) -> u8 {
            self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (self.0 >> 24) as u8
        }
    }

    fn random_block(rng: &mut Lcg, palette: usize) -> [[u8; 4]; 16] {
        let mut colours = [[0u8; 4]; 16];
        for colour in colours.iter_mut() {
            *colour = [rng.next(), rng.next(), rng.next(), 255];
        }
        let mut rgba = [[0u8; 4]; 16];
        for pixel in rgba.iter_mut() {
            *pixel = colours[rng.next() as usize % palette];
        }
        rgba
    }

    #[test]
    fn test_never_worse_than_range_fit() {
        let mut rng = Lcg(0x5eed);
        for round in 0..300 {
            let rgba = random_block(&mut rng, 2 + round % 15);
            let weights = if round % 2 == 0 {
                COLOUR_WEIGHTS_UNIFORM
            } else {
                COLOUR_WEIGHTS_PERCEPTUAL
            };
            let colours = ColourSet::new(&rgba, 0xFFFF, true, false);
            let metric = Vec3::from(weights);
            let range = RangeFit::new(&colours, metric);

            for iterate in [false, true] {
                let mut cluster = ClusterFit::new(&colours, metric, iterate);
                for codebook in [Codebook::Three, Codebook::Four] {
                    let ours = cluster.fit(codebook).error;
                    let theirs = range.fit(codebook).error;
                    assert!(ours <= theirs, "round {round}: {ours} > {theirs}");
                }
            }
        }
    }

    #[test]
    fn test_two_colours_fit_exactly() {
        let mut rgba = [[255, 0, 0, 255]; 16];
        for pixel in rgba.iter_mut().step_by(2) {
            *pixel = [0, 0, 255, 255];
        }
        let colours = ColourSet::new(&rgba, 0xFFFF, true, false);
        let mut fit = ClusterFit::new(&colours, Vec3::from(COLOUR_WEIGHTS_UNIFORM), false);

        let candidate = fit.fit(Codebook::Four);
        assert!(candidate.error < 1e-10);
        assert_ne!(candidate.indices[0], candidate.indices[1]);
        assert!(candidate.indices.iter().all(|&index| index < 2));
    }

    #[test]
    fn test_orderings_are_not_repeated() {
        let mut rgba = [[0u8, 0, 0, 255]; 16];
        for (i, pixel) in rgba.iter_mut().enumerate() {
            *pixel = [(i * 16) as u8, (i * 8) as u8, 0, 255];
        }
        let colours = ColourSet::new(&rgba, 0xFFFF, true, false);
        let mut fit = ClusterFit::new(&colours, Vec3::from(COLOUR_WEIGHTS_UNIFORM), true);

        let axis = Vec3::new(1.0, 0.5, 0.0);
        assert!(fit.construct_ordering(&axis, 0));
        assert_eq!(&fit.orders[0][..4], &[0, 1, 2, 3]);
        // the same axis again gives the same ordering
        assert!(!fit.construct_ordering(&axis, 1));
        // the reverse axis does not
        assert!(fit.construct_ordering(&-axis, 1));
        assert_eq!(fit.orders[1][0], 15);
    }

    #[test]
    fn test_transparent_set_uses_range_fit() {
        let rgba = [[40, 50, 60, 0]; 16];
        let colours = ColourSet::new(&rgba, 0xFFFF, true, false);
        let mut fit = ClusterFit::new(&colours, Vec3::from(COLOUR_WEIGHTS_UNIFORM), true);
        let candidate = fit.fit(Codebook::Three);
        assert_eq!(candidate.indices, [3; 16]);
    }
}
