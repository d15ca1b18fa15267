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

//! Whole-image compression and decompression.
//!
//! Images are tightly packed RGBA8, row-major. They are walked in 4x4 tiles;
//! tiles hanging over the right or bottom edge are compressed with the
//! outside texels masked out. Each row of tiles owns a disjoint slice of the
//! output, which is what lets rows run in parallel under the `rayon` feature.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Buffer, Error, Result};
use crate::{Format, Params};

/// Returns number of blocks needed for an image of given dimension
fn num_blocks(size: usize) -> usize {
    size.div_ceil(4)
}

/// Returns the valid pixel mask for the block at `(block_x, block_y)` of an
/// image, with bit `4 * py + px` set when pixel `(px, py)` of the block lies
/// inside the image.
pub fn block_mask(block_x: usize, block_y: usize, width: usize, height: usize) -> u16 {
    let mut mask = 0u16;
    for py in 0..4 {
        for px in 0..4 {
            // enable pixel if within bounds
            let sx = 4 * block_x + px;
            let sy = 4 * block_y + py;
            if sx < width && sy < height {
                mask |= 1 << (4 * py + px);
            }
        }
    }
    mask
}

/// Bytes of RGBA8 data in an image
fn image_len(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or(Error::DimensionOverflow { width, height })
}

impl Format {
    /// Computes the amount of space in bytes needed for an image of given size,
    /// accounting for padding to a multiple of 4x4 pixels
    ///
    /// Saturates at `usize::MAX` for sizes no buffer could hold.
    ///
    /// * `width`  - Width of the uncompressed image
    /// * `height` - Height of the uncompressed image
    pub fn compressed_size(self, width: usize, height: usize) -> usize {
        self.checked_compressed_size(width, height).unwrap_or(usize::MAX)
    }

    fn checked_compressed_size(self, width: usize, height: usize) -> Result<usize> {
        num_blocks(width)
            .checked_mul(num_blocks(height))
            .and_then(|blocks| blocks.checked_mul(self.block_size()))
            .ok_or(Error::DimensionOverflow { width, height })
    }

    /// Compresses an image in memory
    ///
    /// * `rgba`   - The uncompressed pixel data
    /// * `width`  - The width of the source image
    /// * `height` - The height of the source image
    /// * `params` - Additional compressor parameters
    /// * `output` - Output buffer for the compressed image, at least
    ///   [`compressed_size`](Format::compressed_size) bytes
    pub fn compress(
        self,
        rgba: &[u8],
        width: usize,
        height: usize,
        params: Params,
        output: &mut [u8],
    ) -> Result<()> {
        Error::check(Buffer::Input, image_len(width, height)?, rgba.len())?;
        let size = self.checked_compressed_size(width, height)?;
        Error::check(Buffer::Output, size, output.len())?;

        let block_size = self.block_size();
        let blocks_wide = num_blocks(width);
        debug!(
            format = %self,
            width,
            height,
            blocks = size / block_size,
            algorithm = ?params.algorithm,
            "compressing image"
        );
        if size == 0 {
            return Ok(());
        }

        #[cfg(feature = "rayon")]
        let output_rows = output[..size].par_chunks_mut(blocks_wide * block_size);
        #[cfg(not(feature = "rayon"))]
        let output_rows = output[..size].chunks_mut(blocks_wide * block_size);

        output_rows.enumerate().for_each(|(y, output_row)| {
            let mut source_rgba = [[0u8; 4]; 16];
            let output_blocks = output_row.chunks_mut(block_size);

            output_blocks.enumerate().for_each(|(x, output_block)| {
                // build the 4x4 block of pixels
                let mask = block_mask(x, y, width, height);
                for (index, pixel) in source_rgba.iter_mut().enumerate() {
                    if mask & (1 << index) == 0 {
                        continue;
                    }

                    // copy pixel value from its position in the source image
                    let sx = 4 * x + index % 4;
                    let sy = 4 * y + index / 4;
                    let src_index = 4 * (width * sy + sx);
                    pixel.copy_from_slice(&rgba[src_index..src_index + 4]);
                }

                self.encode_block(&source_rgba, mask, &params, output_block);
            });
        });

        Ok(())
    }

    /// Compresses an image into a newly allocated buffer of exactly
    /// [`compressed_size`](Format::compressed_size) bytes
    pub fn compress_to_vec(self, rgba: &[u8], width: usize, height: usize, params: Params) -> Result<Vec<u8>> {
        // validate before allocating
        Error::check(Buffer::Input, image_len(width, height)?, rgba.len())?;
        let mut output = vec![0u8; self.checked_compressed_size(width, height)?];
        self.compress(rgba, width, height, params, &mut output)?;
        Ok(output)
    }

    /// Decompresses an image in memory
    ///
    /// * `data`   - The compressed image data
    /// * `width`  - The width of the source image
    /// * `height` - The height of the source image
    /// * `output` - Space to store the decompressed image, at least
    ///   `width * height * 4` bytes
    pub fn decompress(self, data: &[u8], width: usize, height: usize, output: &mut [u8]) -> Result<()> {
        let len = image_len(width, height)?;
        Error::check(Buffer::Input, self.checked_compressed_size(width, height)?, data.len())?;
        Error::check(Buffer::Output, len, output.len())?;

        let blocks_wide = num_blocks(width);
        let block_size = self.block_size();
        debug!(
            format = %self,
            width,
            height,
            blocks = blocks_wide * num_blocks(height),
            "decompressing image"
        );
        if len == 0 {
            return Ok(());
        }

        // each chunk holds the up to 4 pixel rows covered by one row of blocks
        let row_len = width * 4;
        #[cfg(feature = "rayon")]
        let output_rows = output[..len].par_chunks_mut(row_len * 4);
        #[cfg(not(feature = "rayon"))]
        let output_rows = output[..len].chunks_mut(row_len * 4);

        // loop over blocks
        output_rows.enumerate().for_each(|(y, output_row)| {
            let rows = output_row.len() / row_len;
            for x in 0..blocks_wide {
                // decompress the block
                let bidx = (x + y * blocks_wide) * block_size;
                let rgba = self.decode_block(&data[bidx..bidx + block_size]);

                // write the decompressed pixels to the correct image location
                for py in 0..rows {
                    for px in 0..4 {
                        let sx = 4 * x + px;
                        if sx < width {
                            let offset = py * row_len + 4 * sx;
                            output_row[offset..offset + 4].copy_from_slice(&rgba[4 * py + px]);
                        }
                    }
                }
            }
        });

        Ok(())
    }

    /// Decompresses an image into a newly allocated buffer of exactly
    /// `width * height * 4` bytes
    pub fn decompress_to_vec(self, data: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
        let len = image_len(width, height)?;
        Error::check(Buffer::Input, self.checked_compressed_size(width, height)?, data.len())?;
        let mut output = vec![0u8; len];
        self.decompress(data, width, height, &mut output)?;
        Ok(output)
    }
}
