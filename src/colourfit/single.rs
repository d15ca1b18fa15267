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

use super::single_lut::{LOOKUP_5_3, LOOKUP_5_4, LOOKUP_6_3, LOOKUP_6_4};
use super::{Candidate, Codebook};
use crate::colourset::ColourSet;
use crate::math::{float_to_int, Vec3};

/// One way of reaching an 8-bit channel value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceBlock {
    pub start: u8,
    pub end: u8,
    pub error: u8,
}

/// The best sources for one 8-bit value: reached through index 0 or index 2
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SingleColourLookup {
    pub sources: [SourceBlock; 2],
}

/// Exact fit for blocks whose points collapse to a single colour
pub struct SingleColourFit<'a> {
    colours: &'a ColourSet,
    colour: [u8; 3],
}

impl<'a> SingleColourFit<'a> {
    pub fn new(colours: &'a ColourSet) -> Self {
        let point = colours.points().first().copied().unwrap_or_default();
        let colour = [
            float_to_int(255.0 * point.x(), 255) as u8,
            float_to_int(255.0 * point.y(), 255) as u8,
            float_to_int(255.0 * point.z(), 255) as u8,
        ];
        SingleColourFit { colours, colour }
    }

    pub fn colours(&self) -> &'a ColourSet {
        self.colours
    }

    pub fn fit(&self, codebook: Codebook) -> Candidate {
        let lookups = match codebook {
            Codebook::Three => [&LOOKUP_5_3, &LOOKUP_6_3, &LOOKUP_5_3],
            Codebook::Four => [&LOOKUP_5_4, &LOOKUP_6_4, &LOOKUP_5_4],
        };

        // check each index combination (endpoint or intermediate)
        let mut best_error = i32::MAX;
        let mut best = 0;
        let mut sources = [SourceBlock { start: 0, end: 0, error: 0 }; 3];
        for index in 0..2 {
            let mut error = 0;
            let mut found = [SourceBlock { start: 0, end: 0, error: 0 }; 3];
            for channel in 0..3 {
                let source = lookups[channel][self.colour[channel] as usize].sources[index];
                found[channel] = source;
                error += source.error as i32 * source.error as i32;
            }

            // keep it if the error is lower
            if error < best_error {
                best_error = error;
                best = index;
                sources = found;
            }
        }

        let endpoint = |pick: fn(&SourceBlock) -> u8| {
            Vec3::new(
                pick(&sources[0]) as f32 / 31.0,
                pick(&sources[1]) as f32 / 63.0,
                pick(&sources[2]) as f32 / 31.0,
            )
        };

        // index 0 never reads the end point, so repeat the start point
        let start = endpoint(|source| source.start);
        let end = if best == 0 { start } else { endpoint(|source| source.end) };

        Candidate {
            codebook,
            start,
            end,
            indices: self.colours.remap_indices(&[2 * best as u8]),
            error: best_error as f32,
        }
    }
}
