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

//! BC3: 8 bytes of interpolated alpha followed by a 4-colour colour block.

use crate::{alpha, colourblock};
use crate::{compress_colour_block, Params};

pub(crate) const BLOCK_SIZE: usize = 16;

pub(crate) fn compress_block(rgba: &[[u8; 4]; 16], mask: u16, params: &Params, block: &mut [u8]) {
    let (alpha_block, colour_block) = block[..BLOCK_SIZE].split_at_mut(8);
    compress_colour_block(rgba, mask, params, false, colour_block);
    alpha::compress_bc3(rgba, mask, alpha_block);
}

pub(crate) fn decompress_block(block: &[u8]) -> [[u8; 4]; 16] {
    let mut rgba = colourblock::decompress(&block[8..BLOCK_SIZE], false);
    alpha::decompress_bc3(&mut rgba, &block[..8]);
    rgba
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_storage_requirements() {
        assert_eq!(Format::Bc3.compressed_size(16, 32), 512);
        assert_eq!(Format::Bc3.compressed_size(15, 32), 512);
    }

    #[test]
    fn test_layout() {
        // opaque white with a hard alpha edge
        let mut rgba = [[255, 255, 255, 255]; 16];
        for pixel in rgba.iter_mut().take(8) {
            pixel[3] = 0;
        }
        let mut block = [0u8; 16];
        Format::Bc3
            .compress_block(&rgba, Params::default(), &mut block)
            .unwrap();

        // both extremes fit the 5-step scheme exactly through its fixed 0 and 255
        assert!(block[0] <= block[1]);
        // the colour block is pure white in both endpoints
        assert_eq!(&block[8..12], &[0xFF, 0xFF, 0xFF, 0xFF]);

        let decoded = Format::Bc3.decompress_block(&block).unwrap();
        assert_eq!(decoded, rgba);
    }

    #[test]
    fn test_alpha_weighting_moves_the_endpoints() {
        // black, mid red and a fully transparent bright red
        let mut rgba = [[0, 0, 0, 255]; 16];
        for pixel in rgba[8..12].iter_mut() {
            *pixel = [128, 0, 0, 255];
        }
        for pixel in rgba[12..].iter_mut() {
            *pixel = [255, 0, 0, 0];
        }

        let encode = |weigh_colour_by_alpha| {
            let params = Params {
                algorithm: Algorithm::ClusterFit,
                weights: COLOUR_WEIGHTS_UNIFORM,
                weigh_colour_by_alpha,
            };
            let mut block = [0u8; 16];
            Format::Bc3.compress_block(&rgba, params, &mut block).unwrap();
            Format::Bc3.decompress_block(&block).unwrap()
        };
        let plain = encode(false);
        let weighted = encode(true);

        // without weighting the bright texels pull the end point up and the
        // mid red texels pay for it
        assert!(plain[8][0].abs_diff(128) > 16, "{:?}", plain[8]);
        // with weighting the opaque mid red is nearly exact instead
        assert!(weighted[8][0].abs_diff(128) <= 4, "{:?}", weighted[8]);
        assert!(weighted[12][0] < plain[12][0]);
    }

    #[test]
    fn test_decompression() {
        // 7-step alpha from 255 down to 0, every texel on index 0 or 1,
        // followed by a 4-colour block of black and white
        let block = [
            0xFF, 0x00, 0b0000_1000, 0, 0, 0, 0, 0, // alpha
            0xFF, 0xFF, 0x00, 0x00, 0b0000_0100, 0, 0, 0, // colour
        ];
        let decoded = Format::Bc3.decompress_block(&block).unwrap();
        assert_eq!(decoded[0], [255, 255, 255, 255]);
        assert_eq!(decoded[1], [0, 0, 0, 0]);
        assert_eq!(decoded[2], [255, 255, 255, 255]);
    }
}
