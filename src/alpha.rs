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

use crate::math::float_to_int;

//--------------------------------------------------------------------------------
// BC2: explicit 4-bit alpha
//--------------------------------------------------------------------------------

/// Quantises alpha to 4 bits per texel, two texels per byte with the first
/// texel in the low nibble. Masked-out texels are written as 0.
pub fn compress_bc2(rgba: &[[u8; 4]; 16], mask: u16, block: &mut [u8]) {
    let quantise = |i: usize| {
        if mask & (1 << i) == 0 {
            0
        } else {
            float_to_int(rgba[i][3] as f32 * (15.0 / 255.0), 15) as u8
        }
    };

    for (i, byte) in block[..8].iter_mut().enumerate() {
        *byte = quantise(2 * i) | (quantise(2 * i + 1) << 4);
    }
}

pub fn decompress_bc2(rgba: &mut [[u8; 4]; 16], block: &[u8]) {
    for (i, &quant) in block[..8].iter().enumerate() {
        let lo = quant & 0x0f;
        let hi = quant & 0xf0;

        // convert back up to bytes
        rgba[2 * i][3] = lo | (lo << 4);
        rgba[2 * i + 1][3] = hi | (hi >> 4);
    }
}

//--------------------------------------------------------------------------------
// BC3: interpolated alpha
//--------------------------------------------------------------------------------

/// One of the two BC3 interpolation schemes fitted to a block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AlphaFit {
    /// Number of interpolation steps between the endpoints, 5 or 7
    pub steps: u8,
    pub min: u8,
    pub max: u8,
    pub indices: [u8; 16],
    /// Sum of squared differences over the enabled texels
    pub error: u32,
}

/// Widens `[min, max]` to span at least `steps`
fn fix_range(min: &mut i32, max: &mut i32, steps: i32) {
    if *max - *min < steps {
        *max = (*min + steps).min(255);
    }
    if *max - *min < steps {
        *min = (*max - steps).max(0);
    }
}

/// Builds the 8-entry codebook for the given endpoints. With 5 steps, entries
/// 6 and 7 are fixed at 0 and 255.
fn codebook(alpha0: u8, alpha1: u8, steps: u8) -> [u8; 8] {
    let a0 = alpha0 as u32;
    let a1 = alpha1 as u32;
    let n = steps as u32;

    let mut codes = [0u8; 8];
    codes[0] = alpha0;
    codes[1] = alpha1;
    for i in 1..n {
        codes[1 + i as usize] = (((n - i) * a0 + i * a1) / n) as u8;
    }
    if steps == 5 {
        codes[6] = 0;
        codes[7] = 255;
    }
    codes
}

fn fit_codes(rgba: &[[u8; 4]; 16], mask: u16, codes: &[u8; 8], indices: &mut [u8; 16]) -> u32 {
    let mut err = 0;
    for (i, index) in indices.iter_mut().enumerate() {
        // masked texels use the first code
        if mask & (1 << i) == 0 {
            *index = 0;
            continue;
        }

        // find the least error and corresponding index
        let value = rgba[i][3] as i32;
        let mut least = i32::MAX;
        for (j, &code) in codes.iter().enumerate() {
            let dist = (value - code as i32).pow(2);
            if dist < least {
                least = dist;
                *index = j as u8;
            }
        }

        err += least as u32;
    }
    err
}

/// Fits both interpolation schemes to the alpha channel of a block,
/// returning the 5-step fit followed by the 7-step fit.
pub(crate) fn fit_bc3(rgba: &[[u8; 4]; 16], mask: u16) -> (AlphaFit, AlphaFit) {
    // get the range for 5-alpha and 7-alpha interpolation
    let mut min5 = 255;
    let mut max5 = 0;
    let mut min7 = 255;
    let mut max7 = 0;
    for (i, pixel) in rgba.iter().enumerate() {
        if mask & (1 << i) == 0 {
            continue;
        }

        let value = pixel[3] as i32;
        min7 = min7.min(value);
        max7 = max7.max(value);
        if value != 0 {
            min5 = min5.min(value);
        }
        if value != 255 {
            max5 = max5.max(value);
        }
    }

    // handle the case that no valid range was found
    if min5 > max5 {
        min5 = max5;
    }
    if min7 > max7 {
        min7 = max7;
    }

    fix_range(&mut min5, &mut max5, 5);
    fix_range(&mut min7, &mut max7, 7);

    let fit = |min: i32, max: i32, steps: u8| {
        let codes = codebook(min as u8, max as u8, steps);
        let mut indices = [0u8; 16];
        let error = fit_codes(rgba, mask, &codes, &mut indices);
        AlphaFit {
            steps,
            min: min as u8,
            max: max as u8,
            indices,
            error,
        }
    };

    (fit(min5, max5, 5), fit(min7, max7, 7))
}

fn write_alpha_block(alpha0: u8, alpha1: u8, indices: &[u8; 16], block: &mut [u8]) {
    block[0] = alpha0;
    block[1] = alpha1;

    // pack 8 3-bit values into each group of 3 bytes
    for (dest, src) in block[2..8].chunks_exact_mut(3).zip(indices.chunks_exact(8)) {
        let value = src
            .iter()
            .enumerate()
            .fold(0u32, |acc, (j, &index)| acc | ((index as u32) << (3 * j)));
        dest.copy_from_slice(&value.to_le_bytes()[..3]);
    }
}

/// The 5-step scheme is selected by decoders when `alpha0 <= alpha1`
fn write_alpha_block5(fit: &AlphaFit, block: &mut [u8]) {
    if fit.min > fit.max {
        let swapped = fit.indices.map(|index| match index {
            0 => 1,
            1 => 0,
            2..=5 => 7 - index,
            _ => index,
        });
        write_alpha_block(fit.max, fit.min, &swapped, block);
    } else {
        write_alpha_block(fit.min, fit.max, &fit.indices, block);
    }
}

/// The 7-step scheme is selected by decoders when `alpha0 > alpha1`
fn write_alpha_block7(fit: &AlphaFit, block: &mut [u8]) {
    if fit.min < fit.max {
        let swapped = fit.indices.map(|index| match index {
            0 => 1,
            1 => 0,
            _ => 9 - index,
        });
        write_alpha_block(fit.max, fit.min, &swapped, block);
    } else {
        write_alpha_block(fit.min, fit.max, &fit.indices, block);
    }
}

pub fn compress_bc3(rgba: &[[u8; 4]; 16], mask: u16, block: &mut [u8]) {
    let (fit5, fit7) = fit_bc3(rgba, mask);

    // save the block with least error
    if fit5.error <= fit7.error {
        write_alpha_block5(&fit5, block);
    } else {
        write_alpha_block7(&fit7, block);
    }
}

pub fn decompress_bc3(rgba: &mut [[u8; 4]; 16], block: &[u8]) {
    let alpha0 = block[0];
    let alpha1 = block[1];

    let codes = if alpha0 <= alpha1 {
        codebook(alpha0, alpha1, 5)
    } else {
        codebook(alpha0, alpha1, 7)
    };

    // each group of 3 bytes holds 8 indices
    for (group, src) in block[2..8].chunks_exact(3).enumerate() {
        let value = u32::from_le_bytes([src[0], src[1], src[2], 0]);
        for j in 0..8 {
            let index = (value >> (3 * j)) & 0x7;
            rgba[8 * group + j][3] = codes[index as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_block(alphas: [u8; 16]) -> [[u8; 4]; 16] {
        alphas.map(|a| [0, 0, 0, a])
    }

    fn gradient() -> [u8; 16] {
        core::array::from_fn(|i| (i * 0x11) as u8)
    }

    #[test]
    fn test_bc2_pack_order() {
        let mut block = [0u8; 8];
        compress_bc2(&alpha_block(gradient()), 0xFFFF, &mut block);
        assert_eq!(block, [0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE]);

        let mut rgba = [[0u8; 4]; 16];
        decompress_bc2(&mut rgba, &block);
        for (pixel, expected) in rgba.iter().zip(gradient()) {
            assert_eq!(pixel[3], expected);
        }
    }

    #[test]
    fn test_bc2_masked_texels_are_zero() {
        let mut block = [0u8; 8];
        compress_bc2(&alpha_block([255; 16]), 0xFFFE, &mut block);
        assert_eq!(block[0], 0xF0);
        assert!(block[1..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_fix_range() {
        let (mut min, mut max) = (100, 100);
        fix_range(&mut min, &mut max, 7);
        assert_eq!((min, max), (100, 107));

        let (mut min, mut max) = (252, 254);
        fix_range(&mut min, &mut max, 5);
        assert_eq!((min, max), (250, 255));
    }

    #[test]
    fn test_codebooks() {
        assert_eq!(codebook(0, 255, 7), [0, 255, 36, 72, 109, 145, 182, 218]);
        assert_eq!(codebook(0, 255, 5), [0, 255, 51, 102, 153, 204, 0, 255]);
    }

    #[test]
    fn test_bc3_gradient_roundtrip_error_is_small() {
        let alphas = gradient();
        let mut block = [0u8; 8];
        compress_bc3(&alpha_block(alphas), 0xFFFF, &mut block);

        let mut rgba = [[0u8; 4]; 16];
        decompress_bc3(&mut rgba, &block);
        for (pixel, expected) in rgba.iter().zip(alphas) {
            assert!((pixel[3] as i32 - expected as i32).abs() <= 18);
        }
    }

    #[test]
    fn test_bc3_uses_fixed_extremes_with_5_steps() {
        // 0 and 255 are exact in the 5-step scheme while the rest stays in a narrow band
        let mut alphas = [128u8; 16];
        alphas[0] = 0;
        alphas[1] = 255;
        alphas[2] = 130;
        let (fit5, fit7) = fit_bc3(&alpha_block(alphas), 0xFFFF);
        assert!(fit5.error < fit7.error);

        let mut block = [0u8; 8];
        compress_bc3(&alpha_block(alphas), 0xFFFF, &mut block);
        assert!(block[0] <= block[1]);

        let mut rgba = [[0u8; 4]; 16];
        decompress_bc3(&mut rgba, &block);
        assert_eq!(rgba[0][3], 0);
        assert_eq!(rgba[1][3], 255);
    }

    #[test]
    fn test_bc3_flat_alpha_is_exact() {
        for value in [0u8, 1, 77, 254, 255] {
            let mut block = [0u8; 8];
            compress_bc3(&alpha_block([value; 16]), 0xFFFF, &mut block);
            let mut rgba = [[0u8; 4]; 16];
            decompress_bc3(&mut rgba, &block);
            assert!(rgba.iter().all(|p| p[3] == value), "value {}", value);
        }
    }

    #[test]
    fn test_bc3_index_packing() {
        let mut indices = [0u8; 16];
        for (i, index) in indices.iter_mut().enumerate() {
            *index = (i % 8) as u8;
        }
        let mut block = [0u8; 8];
        write_alpha_block(10, 20, &indices, &mut block);
        // 0o76543210 in little-endian order
        assert_eq!(&block[2..5], &[0x88, 0xC6, 0xFA]);
        assert_eq!(&block[5..8], &[0x88, 0xC6, 0xFA]);
    }

    proptest::proptest! {
        #[test]
        fn prop_bc3_keeps_the_scheme_with_less_error(alphas: [u8; 16], mask: u16) {
            let rgba = alpha_block(alphas);
            let (fit5, fit7) = fit_bc3(&rgba, mask);
            let mut block = [0u8; 8];
            compress_bc3(&rgba, mask, &mut block);

            // the endpoint order tells decoders which scheme was written
            proptest::prop_assert_eq!(block[0] <= block[1], fit5.error <= fit7.error);

            let mut decoded = [[0u8; 4]; 16];
            decompress_bc3(&mut decoded, &block);
            let error: u32 = (0..16)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| (decoded[i][3] as i32 - alphas[i] as i32).pow(2) as u32)
                .sum();
            proptest::prop_assert_eq!(error, fit5.error.min(fit7.error));
        }
    }
}
