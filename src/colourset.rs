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

use crate::math::Vec3;

/// Index written for texels that are not part of the point set
const DONT_CARE_INDEX: u8 = 3;

/// The minimal set of distinct colours in a block
pub struct ColourSet {
    count: usize,
    points: [Vec3; 16],
    weights: [f32; 16],
    remap: [Option<u8>; 16],
    transparent: bool,
}

impl ColourSet {
    /// Builds the point set for a block.
    ///
    /// * `rgba`   - The 16 texels of the block
    /// * `mask`   - One bit per texel, set for texels inside the image
    /// * `is_bc1` - Texels with alpha below 128 are dropped as transparent
    /// * `weigh_colour_by_alpha` - Scale each texel's weight by `(alpha + 1) / 256`
    pub fn new(rgba: &[[u8; 4]; 16], mask: u16, is_bc1: bool, weigh_colour_by_alpha: bool) -> Self {
        let mut set = ColourSet {
            count: 0,
            points: [Vec3::default(); 16],
            weights: [0.0; 16],
            remap: [None; 16],
            transparent: false,
        };

        let is_transparent = |pixel: &[u8; 4]| is_bc1 && pixel[3] < 128;

        for i in 0..16 {
            // check this pixel is enabled
            if mask & (1 << i) == 0 {
                continue;
            }

            let pixel = &rgba[i];
            if is_transparent(pixel) {
                set.transparent = true;
                continue;
            }

            // ensure there is always non-zero weight even for zero alpha
            let weight = if weigh_colour_by_alpha {
                (pixel[3] as f32 + 1.0) / 256.0
            } else {
                1.0
            };

            // merge with an earlier enabled pixel of the same colour
            let matched = (0..i).find(|&j| {
                mask & (1 << j) != 0 && rgba[j][..3] == pixel[..3] && !is_transparent(&rgba[j])
            });

            match matched.and_then(|j| set.remap[j]) {
                Some(index) => {
                    set.weights[index as usize] += weight;
                    set.remap[i] = Some(index);
                }
                None => {
                    set.points[set.count] = Vec3::new(
                        pixel[0] as f32 / 255.0,
                        pixel[1] as f32 / 255.0,
                        pixel[2] as f32 / 255.0,
                    );
                    set.weights[set.count] = weight;
                    set.remap[i] = Some(set.count as u8);
                    set.count += 1;
                }
            }
        }

        // square root the weights
        for weight in &mut set.weights[..set.count] {
            *weight = libm::sqrtf(*weight);
        }

        set
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.count]
    }

    /// Square roots of the accumulated point weights
    pub fn weights(&self) -> &[f32] {
        &self.weights[..self.count]
    }

    /// Whether any enabled texel was dropped for having low alpha
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Expands per-point indices to per-texel indices, writing the don't-care
    /// index 3 for texels outside the set.
    pub fn remap_indices(&self, source: &[u8]) -> [u8; 16] {
        let mut target = [DONT_CARE_INDEX; 16];
        for (t, remap) in target.iter_mut().zip(self.remap.iter()) {
            if let Some(index) = remap {
                *t = source[*index as usize];
            }
        }
        target
    }
}
