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

//! Endpoint fitting for the colour part of a block.
//!
//! Three strategies share one contract: given a codebook size, pick two
//! endpoints and an index per point, and report the error of that choice.
//! [`ColourFit`] picks the strategy for a block and runs the 3- and 4-colour
//! variants the format allows.

mod cluster;
mod range;
mod single;
mod single_lut;

pub use cluster::ClusterFit;
pub use range::RangeFit;
pub use single::SingleColourFit;

use crate::colourblock::{write_colour_block3, write_colour_block4};
use crate::colourset::ColourSet;
use crate::math::Vec3;
use crate::{Algorithm, Params};

/// Number of entries in the colour codebook
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codebook {
    /// Two endpoints and their midpoint; index 3 is transparent black in BC1
    Three,
    /// Two endpoints and the colours at 1/3 and 2/3 between them
    Four,
}

impl Codebook {
    /// The codebook colours for a pair of endpoints, in index order
    pub fn colours(self, start: Vec3, end: Vec3) -> ([Vec3; 4], usize) {
        match self {
            Codebook::Three => ([start, end, 0.5 * start + 0.5 * end, Vec3::default()], 3),
            Codebook::Four => (
                [
                    start,
                    end,
                    (2.0 / 3.0) * start + (1.0 / 3.0) * end,
                    (1.0 / 3.0) * start + (2.0 / 3.0) * end,
                ],
                4,
            ),
        }
    }
}

/// The result of fitting one codebook size to a block
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub codebook: Codebook,
    pub start: Vec3,
    pub end: Vec3,
    /// Per-texel indices, already expanded through the colour set's remap
    pub indices: [u8; 16],
    pub error: f32,
}

impl Candidate {
    /// Writes the 8-byte colour block for this candidate
    pub fn write(&self, block: &mut [u8]) {
        match self.codebook {
            Codebook::Three => write_colour_block3(&self.start, &self.end, &self.indices, block),
            Codebook::Four => write_colour_block4(&self.start, &self.end, &self.indices, block),
        }
    }
}

/// Error of a per-point index assignment, measured as the sum over points of
/// the squared channel-weighted distance to the assigned codebook colour,
/// scaled by the point's accumulated weight.
///
/// `weights` are the square roots kept by [`ColourSet`], so each term is
/// scaled by `weight * weight`.
pub(crate) fn assignment_error(
    points: &[Vec3],
    weights: &[f32],
    metric: Vec3,
    codes: &[Vec3],
    indices: &[u8],
) -> f32 {
    points
        .iter()
        .zip(weights)
        .zip(indices)
        .map(|((point, &weight), &index)| {
            weight * weight * (metric * (*point - codes[index as usize])).length_squared()
        })
        .sum()
}

/// Colour fitting strategy for one block
pub enum ColourFit<'a> {
    Range(RangeFit<'a>),
    Cluster(ClusterFit<'a>),
    Single(SingleColourFit<'a>),
}

impl<'a> ColourFit<'a> {
    /// Picks the strategy for a colour set: single-colour fit for one point,
    /// range fit when requested or when there is nothing to cluster, and
    /// cluster fit otherwise.
    pub fn new(colours: &'a ColourSet, params: &Params) -> Self {
        let weights = Vec3::from(params.weights);
        match (colours.count(), params.algorithm) {
            (1, _) => ColourFit::Single(SingleColourFit::new(colours)),
            (0, _) | (_, Algorithm::RangeFit) => ColourFit::Range(RangeFit::new(colours, weights)),
            (_, algorithm) => ColourFit::Cluster(ClusterFit::new(
                colours,
                weights,
                algorithm == Algorithm::IterativeClusterFit,
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColourFit::Range(_) => "range",
            ColourFit::Cluster(fit) if fit.is_iterative() => "iterative cluster",
            ColourFit::Cluster(_) => "cluster",
            ColourFit::Single(_) => "single colour",
        }
    }

    fn colours(&self) -> &'a ColourSet {
        match self {
            ColourFit::Range(fit) => fit.colours(),
            ColourFit::Cluster(fit) => fit.colours(),
            ColourFit::Single(fit) => fit.colours(),
        }
    }

    /// Fits one codebook size
    pub fn fit(&mut self, codebook: Codebook) -> Candidate {
        match self {
            ColourFit::Range(fit) => fit.fit(codebook),
            ColourFit::Cluster(fit) => fit.fit(codebook),
            ColourFit::Single(fit) => fit.fit(codebook),
        }
    }

    /// Finds the best candidate the format allows.
    ///
    /// BC1 tries the 3-colour codebook first and only tries four colours
    /// when no texel was dropped as transparent; BC2 and BC3 always decode
    /// four colours.
    pub fn best(&mut self, is_bc1: bool) -> Candidate {
        if !is_bc1 {
            return self.fit(Codebook::Four);
        }

        let three = self.fit(Codebook::Three);
        if self.colours().is_transparent() {
            return three;
        }

        let four = self.fit(Codebook::Four);
        if four.error < three.error {
            four
        } else {
            three
        }
    }

    /// Compresses the colour part of a block into 8 bytes
    pub fn compress(&mut self, is_bc1: bool, block: &mut [u8]) {
        self.best(is_bc1).write(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::COLOUR_WEIGHTS_UNIFORM;
    use rstest::rstest;

    fn params(algorithm: Algorithm) -> Params {
        Params {
            algorithm,
            weights: COLOUR_WEIGHTS_UNIFORM,
            weigh_colour_by_alpha: false,
        }
    }

    fn gradient() -> [[u8; 4]; 16] {
        let mut rgba = [[0u8; 4]; 16];
        for (i, pixel) in rgba.iter_mut().enumerate() {
            *pixel = [(i * 17) as u8, 255 - (i * 17) as u8, 60, 255];
        }
        rgba
    }

    #[rstest]
    #[case(Algorithm::RangeFit, "range")]
    #[case(Algorithm::ClusterFit, "cluster")]
    #[case(Algorithm::IterativeClusterFit, "iterative cluster")]
    fn test_strategy_selection(#[case] algorithm: Algorithm, #[case] name: &str) {
        let rgba = gradient();
        let colours = ColourSet::new(&rgba, 0xFFFF, true, false);
        assert_eq!(ColourFit::new(&colours, &params(algorithm)).name(), name);

        // one distinct colour always takes the exact fit
        let flat = [[9, 99, 199, 255]; 16];
        let colours = ColourSet::new(&flat, 0xFFFF, true, false);
        assert_eq!(ColourFit::new(&colours, &params(algorithm)).name(), "single colour");

        // nothing to cluster without points
        let colours = ColourSet::new(&gradient(), 0, true, false);
        assert_eq!(ColourFit::new(&colours, &params(algorithm)).name(), "range");
    }

    #[test]
    fn test_bc1_keeps_the_better_codebook() {
        let rgba = gradient();
        let colours = ColourSet::new(&rgba, 0xFFFF, true, false);
        let mut fit = ColourFit::new(&colours, &params(Algorithm::ClusterFit));

        let three = fit.fit(Codebook::Three);
        let four = fit.fit(Codebook::Four);
        let best = fit.best(true);
        assert_eq!(best.error, three.error.min(four.error));
        // a smooth gradient is better served by four colours
        assert_eq!(best.codebook, Codebook::Four);
    }

    #[test]
    fn test_transparency_forces_three_colours() {
        let mut rgba = gradient();
        rgba[5][3] = 0;
        let colours = ColourSet::new(&rgba, 0xFFFF, true, false);
        let mut fit = ColourFit::new(&colours, &params(Algorithm::ClusterFit));
        assert_eq!(fit.best(true).codebook, Codebook::Three);
    }

    #[test]
    fn test_bc2_and_bc3_only_use_four_colours() {
        // black, white and their midpoint fit three colours exactly
        let mut rgba = [[0, 0, 0, 255]; 16];
        for pixel in rgba.iter_mut().skip(5) {
            *pixel = [255, 255, 255, 255];
        }
        rgba[15] = [128, 128, 128, 255];
        let colours = ColourSet::new(&rgba, 0xFFFF, false, false);
        let mut fit = ColourFit::new(&colours, &params(Algorithm::ClusterFit));
        assert_eq!(fit.best(false).codebook, Codebook::Four);
    }

    /// Sum over all sixteen texels of the squared distance to the decoded
    /// codebook colour
    fn texel_error(rgba: &[[u8; 4]; 16], candidate: &Candidate) -> f32 {
        let (codes, _) = candidate.codebook.colours(candidate.start, candidate.end);
        rgba.iter()
            .zip(candidate.indices)
            .map(|(pixel, index)| {
                let point = Vec3::new(
                    pixel[0] as f32 / 255.0,
                    pixel[1] as f32 / 255.0,
                    pixel[2] as f32 / 255.0,
                );
                (point - codes[index as usize]).length_squared()
            })
            .sum()
    }

    #[test]
    fn test_dominant_colour_steers_the_codebook_choice() {
        let mut seed = 0x1234_5678u32;
        let mut next = || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 24) as u8
        };

        for round in 0..500 {
            let palette: [[u8; 4]; 3] = core::array::from_fn(|_| [next(), next(), next(), 255]);
            // 13 texels of the first colour, 2 of the second, 1 of the third
            let mut rgba = [palette[0]; 16];
            rgba[13] = palette[1];
            rgba[14] = palette[1];
            rgba[15] = palette[2];

            let colours = ColourSet::new(&rgba, 0xFFFF, true, false);
            if colours.count() < 3 {
                continue;
            }
            let mut fit = ColourFit::new(&colours, &params(Algorithm::ClusterFit));
            let three = fit.fit(Codebook::Three);
            let four = fit.fit(Codebook::Four);
            let best = fit.best(true);

            for candidate in [&three, &four] {
                let expected = texel_error(&rgba, candidate);
                assert!(
                    (candidate.error - expected).abs() <= 1e-4 * expected.max(1.0),
                    "round {round}: reported {} but texels give {expected}",
                    candidate.error
                );
            }
            let chosen = texel_error(&rgba, &best);
            let lowest = texel_error(&rgba, &three).min(texel_error(&rgba, &four));
            assert!(
                chosen <= lowest + 1e-4 * lowest.max(1.0),
                "round {round}: {chosen} > {lowest}"
            );
        }
    }

    #[test]
    fn test_assignment_error() {
        let points = [Vec3::splat(0.0), Vec3::splat(1.0)];
        let codes = [Vec3::splat(0.0), Vec3::splat(0.5)];
        let metric = Vec3::new(1.0, 2.0, 0.0);
        // (0.5 * 1)^2 + (0.5 * 2)^2 for the second point
        assert_eq!(assignment_error(&points, &[1.0, 1.0], metric, &codes, &[0, 1]), 1.25);
        // a point covering four texels has a square-rooted weight of 2
        assert_eq!(assignment_error(&points, &[1.0, 2.0], metric, &codes, &[0, 1]), 5.0);
    }
}
