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

//! BC1: a single 8-byte colour block. Texels with alpha below 128 are
//! encoded through the 3-colour mode's transparent index.

use crate::colourblock;
use crate::{compress_colour_block, Params};

pub(crate) const BLOCK_SIZE: usize = 8;

pub(crate) fn compress_block(rgba: &[[u8; 4]; 16], mask: u16, params: &Params, block: &mut [u8]) {
    compress_colour_block(rgba, mask, params, true, &mut block[..BLOCK_SIZE]);
}

pub(crate) fn decompress_block(block: &[u8]) -> [[u8; 4]; 16] {
    colourblock::decompress(&block[..BLOCK_SIZE], true)
}

#[cfg(test)]
mod tests {
    use crate::*;
    use rstest::rstest;

    #[test]
    fn test_storage_requirements() {
        assert_eq!(Format::Bc1.compressed_size(16, 32), 256);
        assert_eq!(Format::Bc1.compressed_size(15, 32), 256);
    }

    // The test-pattern is a gray-scale checkerboard of size 4x4 with 0xFF in the top-left.
    // On top of that, the four middle pixels are set to 0x7F.
    static DECODED_BLOCK_GRAY_4X4: &[u8] = &[
        0xFF, 0x00, 0xFF, 0x00, // row 0
        0x00, 0x7F, 0x7F, 0xFF, // row 1
        0xFF, 0x7F, 0x7F, 0x00, // row 2
        0x00, 0xFF, 0x00, 0xFF, // row 3
    ];

    // BC1 data created with AMD Compressonator v4.1.5083
    static ENCODED_BLOCK_GRAY_4X4: [u8; 8] = [0x00, 0x00, 0xFF, 0xFF, 0x11, 0x68, 0x29, 0x44];

    fn decoded_block_gray_4x4_as_rgba() -> [u8; 4 * 4 * 4] {
        let mut output = [0u8; 4 * 4 * 4];
        for (pixel, &value) in output.chunks_exact_mut(4).zip(DECODED_BLOCK_GRAY_4X4) {
            pixel.copy_from_slice(&[value, value, value, 0xFF]);
        }
        output
    }

    // A colour test-pattern (RGB) with the first row in one colour,
    // the second in another and the third and last row in a third colour.
    static DECODED_BLOCK_COLOUR_4X4: &[u8] = &[
        255, 150, 74, 255, 150, 74, 255, 150, 74, 255, 150, 74, // row 0
        255, 120, 52, 255, 120, 52, 255, 120, 52, 255, 120, 52, // row 1
        255, 105, 41, 255, 105, 41, 255, 105, 41, 255, 105, 41, // row 2
        255, 105, 41, 255, 105, 41, 255, 105, 41, 255, 105, 41, // row 3
    ];

    // BC1 data created with AMD Compressonator v4.1.5083 and is the same as libsquish
    static ENCODED_BLOCK_COLOUR_4X4: [u8; 8] = [0xA9, 0xFC, 0x45, 0xFB, 0x00, 0xFF, 0x55, 0x55];

    fn decoded_block_colour_4x4_as_rgba() -> [u8; 4 * 4 * 4] {
        let mut output = [0u8; 4 * 4 * 4];
        for (pixel, rgb) in output.chunks_exact_mut(4).zip(DECODED_BLOCK_COLOUR_4X4.chunks_exact(3)) {
            pixel.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 0xFF]);
        }
        output
    }

    fn uniform(algorithm: Algorithm) -> Params {
        Params {
            algorithm,
            weights: COLOUR_WEIGHTS_UNIFORM,
            weigh_colour_by_alpha: false,
        }
    }

    #[test]
    fn test_bc1_decompression_gray() {
        let mut output_actual = [0u8; 4 * 4 * 4];
        Format::Bc1
            .decompress(&ENCODED_BLOCK_GRAY_4X4, 4, 4, &mut output_actual)
            .unwrap();
        assert_eq!(output_actual, decoded_block_gray_4x4_as_rgba());
    }

    // all algorithms should result in the same expected output
    #[rstest]
    #[case(Algorithm::ClusterFit)]
    #[case(Algorithm::RangeFit)]
    #[case(Algorithm::IterativeClusterFit)]
    fn test_bc1_compression_gray(#[case] algorithm: Algorithm) {
        let mut output_actual = [0u8; 8];
        Format::Bc1
            .compress(&decoded_block_gray_4x4_as_rgba(), 4, 4, uniform(algorithm), &mut output_actual)
            .unwrap();
        assert_eq!(output_actual, ENCODED_BLOCK_GRAY_4X4);
    }

    #[test]
    fn test_bc1_decompression_colour() {
        let mut output_actual = [0u8; 4 * 4 * 4];
        Format::Bc1
            .decompress(&ENCODED_BLOCK_COLOUR_4X4, 4, 4, &mut output_actual)
            .unwrap();
        assert_eq!(output_actual, decoded_block_colour_4x4_as_rgba());
    }

    #[rstest]
    #[case(Algorithm::ClusterFit)]
    #[case(Algorithm::RangeFit)]
    #[case(Algorithm::IterativeClusterFit)]
    fn test_bc1_compression_colour(#[case] algorithm: Algorithm) {
        let mut output_actual = [0u8; 8];
        Format::Bc1
            .compress(&decoded_block_colour_4x4_as_rgba(), 4, 4, uniform(algorithm), &mut output_actual)
            .unwrap();
        assert_eq!(output_actual, ENCODED_BLOCK_COLOUR_4X4);
    }

    #[rstest]
    #[case(Algorithm::ClusterFit)]
    #[case(Algorithm::RangeFit)]
    #[case(Algorithm::IterativeClusterFit)]
    fn test_solid_red_is_exact(#[case] algorithm: Algorithm) {
        let rgba = [[255, 0, 0, 255]; 16];
        let mut block = [0u8; 8];
        Format::Bc1
            .compress_block(&rgba, uniform(algorithm), &mut block)
            .unwrap();

        // both endpoints are pure red
        assert_eq!(&block[0..2], &[0x00, 0xF8]);
        assert_eq!(&block[2..4], &[0x00, 0xF8]);
        assert_eq!(Format::Bc1.decompress_block(&block).unwrap(), rgba);
    }

    #[test]
    fn test_fully_transparent_block() {
        let rgba = [[90, 180, 30, 0]; 16];
        let mut block = [0u8; 8];
        Format::Bc1
            .compress_block(&rgba, Params::default(), &mut block)
            .unwrap();

        // zero endpoints select the 3-colour mode, index 3 everywhere
        assert_eq!(block, [0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(Format::Bc1.decompress_block(&block).unwrap(), [[0, 0, 0, 0]; 16]);
    }

    #[test]
    fn test_punch_through_alpha() {
        let mut rgba = [[200, 40, 40, 255]; 16];
        rgba[0] = [0, 0, 0, 0];
        rgba[15] = [255, 255, 255, 100];
        let mut block = [0u8; 8];
        Format::Bc1
            .compress_block(&rgba, Params::default(), &mut block)
            .unwrap();

        // transparent texels force the 3-colour mode
        assert!(u16::from_le_bytes([block[0], block[1]]) <= u16::from_le_bytes([block[2], block[3]]));
        let decoded = Format::Bc1.decompress_block(&block).unwrap();
        assert_eq!(decoded[0], [0, 0, 0, 0]);
        assert_eq!(decoded[15], [0, 0, 0, 0]);
        assert!(decoded[1..15].iter().all(|pixel| pixel[3] == 255));
    }
}
