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

use crate::error::{Buffer, Error, Result};
use crate::{bc1, bc2, bc3, Params};

/// The block compression formats supported by this crate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// Colour with optional 1-bit alpha (DXT1)
    #[default]
    Bc1,
    /// Explicit 4-bit alpha and colour (DXT3)
    Bc2,
    /// Interpolated alpha and colour (DXT5)
    Bc3,
}

impl Format {
    /// Returns how many bytes a 4x4 block of pixels will compress into.
    pub fn block_size(self) -> usize {
        match self {
            Format::Bc1 => bc1::BLOCK_SIZE,
            Format::Bc2 => bc2::BLOCK_SIZE,
            Format::Bc3 => bc3::BLOCK_SIZE,
        }
    }

    /// Compresses a 4x4 block of pixels.
    ///
    /// * `rgba`   - The uncompressed block of pixels
    /// * `params` - Additional compressor parameters
    /// * `output` - Storage for the compressed block, at least
    ///   [`block_size`](Format::block_size) bytes
    pub fn compress_block(self, rgba: &[[u8; 4]; 16], params: Params, output: &mut [u8]) -> Result<()> {
        self.compress_block_masked(rgba, 0xFFFF, params, output)
    }

    /// Compresses a 4x4 block of pixels, masking out some pixels e.g. for padding the
    /// image to a multiple of the block size.
    ///
    /// * `rgba`   - The uncompressed block of pixels
    /// * `mask`   - The valid pixel mask, bit `4 * y + x` set for pixel `(x, y)`
    /// * `params` - Additional compressor parameters
    /// * `output` - Storage for the compressed block
    ///
    /// Masked-out pixels have no influence on the output.
    pub fn compress_block_masked(
        self,
        rgba: &[[u8; 4]; 16],
        mask: u16,
        params: Params,
        output: &mut [u8],
    ) -> Result<()> {
        Error::check(Buffer::Block, self.block_size(), output.len())?;
        self.encode_block(rgba, mask, &params, output);
        Ok(())
    }

    /// Decompresses a 4x4 block of pixels
    ///
    /// * `block` - The compressed block, at least [`block_size`](Format::block_size) bytes
    pub fn decompress_block(self, block: &[u8]) -> Result<[[u8; 4]; 16]> {
        Error::check(Buffer::Block, self.block_size(), block.len())?;
        Ok(self.decode_block(block))
    }

    pub(crate) fn encode_block(self, rgba: &[[u8; 4]; 16], mask: u16, params: &Params, output: &mut [u8]) {
        match self {
            Format::Bc1 => bc1::compress_block(rgba, mask, params, output),
            Format::Bc2 => bc2::compress_block(rgba, mask, params, output),
            Format::Bc3 => bc3::compress_block(rgba, mask, params, output),
        }
    }

    pub(crate) fn decode_block(self, block: &[u8]) -> [[u8; 4]; 16] {
        match self {
            Format::Bc1 => bc1::decompress_block(block),
            Format::Bc2 => bc2::decompress_block(block),
            Format::Bc3 => bc3::decompress_block(block),
        }
    }
}

impl core::fmt::Display for Format {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Format::Bc1 => "BC1",
            Format::Bc2 => "BC2",
            Format::Bc3 => "BC3",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Format::Bc1, 8)]
    #[case(Format::Bc2, 16)]
    #[case(Format::Bc3, 16)]
    fn test_block_size(#[case] format: Format, #[case] size: usize) {
        assert_eq!(format.block_size(), size);

        let mut output = [0xAAu8; 17];
        format
            .compress_block(&[[1, 2, 3, 4]; 16], Params::default(), &mut output)
            .unwrap();
        // nothing past the block is touched
        assert!(output[size..].iter().all(|&byte| byte == 0xAA));
    }

    #[rstest]
    #[case(Format::Bc1)]
    #[case(Format::Bc2)]
    #[case(Format::Bc3)]
    fn test_short_block_is_rejected(#[case] format: Format) {
        let mut output = [0u8; 7];
        assert_eq!(
            format.compress_block(&[[0; 4]; 16], Params::default(), &mut output),
            Err(Error::SizeMismatch {
                buffer: Buffer::Block,
                needed: format.block_size(),
                actual: 7
            })
        );
        assert!(format.decompress_block(&output).is_err());
        assert!(output.iter().all(|&byte| byte == 0));
    }

    #[rstest]
    #[case(Format::Bc1)]
    #[case(Format::Bc2)]
    #[case(Format::Bc3)]
    fn test_masked_texels_do_not_matter(#[case] format: Format) {
        let mut rgba = [[0u8; 4]; 16];
        for (i, pixel) in rgba.iter_mut().enumerate() {
            *pixel = [(i * 13) as u8, (i * 7) as u8, 255 - (i * 11) as u8, (i * 17) as u8];
        }
        let mask = 0b0000_0111_0111_0111;

        let mut expected = [0u8; 16];
        format
            .compress_block_masked(&rgba, mask, Params::default(), &mut expected)
            .unwrap();

        for (i, pixel) in rgba.iter_mut().enumerate() {
            if mask & (1 << i) == 0 {
                *pixel = [255, 0, 255, 0];
            }
        }
        let mut actual = [0u8; 16];
        format
            .compress_block_masked(&rgba, mask, Params::default(), &mut actual)
            .unwrap();
        assert_eq!(actual, expected);
    }
}
