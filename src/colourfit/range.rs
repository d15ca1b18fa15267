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

use super::{assignment_error, Candidate, Codebook};
use crate::colourset::ColourSet;
use crate::math::{Sym3x3, Vec3};

/// Fits endpoints to the extremes of the colour set along its principal axis
pub struct RangeFit<'a> {
    colours: &'a ColourSet,
    metric: Vec3,
    principle: Vec3,
    start: Vec3,
    end: Vec3,
}

impl<'a> RangeFit<'a> {
    pub fn new(colours: &'a ColourSet, metric: Vec3) -> Self {
        let points = colours.points();

        // get the covariance matrix and its principal component
        let covariance = Sym3x3::weighted_covariance(points, colours.weights());
        let principle = covariance.principle_component();

        // get the min and max range as the codebook endpoints
        let mut start = Vec3::default();
        let mut end = Vec3::default();
        if let Some(first) = points.first() {
            start = *first;
            end = *first;
            let mut min = first.dot(&principle);
            let mut max = min;
            for point in &points[1..] {
                let value = point.dot(&principle);
                if value < min {
                    start = *point;
                    min = value;
                } else if value > max {
                    end = *point;
                    max = value;
                }
            }
        }

        RangeFit {
            colours,
            metric,
            principle,
            start: start.clamp_to_grid(),
            end: end.clamp_to_grid(),
        }
    }

    pub fn colours(&self) -> &'a ColourSet {
        self.colours
    }

    /// Principal axis of the weighted colour distribution
    pub fn principle(&self) -> Vec3 {
        self.principle
    }

    /// Assigns every point to its closest codebook colour
    pub fn fit(&self, codebook: Codebook) -> Candidate {
        let points = self.colours.points();
        let (codes, count) = codebook.colours(self.start, self.end);

        let mut closest = [0u8; 16];
        for (index, point) in closest.iter_mut().zip(points) {
            let mut best = f32::MAX;
            for (j, code) in codes[..count].iter().enumerate() {
                let dist = (self.metric * (*point - *code)).length_squared();
                if dist < best {
                    best = dist;
                    *index = j as u8;
                }
            }
        }

        Candidate {
            codebook,
            start: self.start,
            end: self.end,
            indices: self.colours.remap_indices(&closest),
            error: assignment_error(
                points,
                self.colours.weights(),
                self.metric,
                &codes,
                &closest[..points.len()],
            ),
        }
    }
}
