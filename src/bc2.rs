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

//! BC2: 8 bytes of explicit 4-bit alpha followed by a 4-colour colour block.

use crate::{alpha, colourblock};
use crate::{compress_colour_block, Params};

pub(crate) const BLOCK_SIZE: usize = 16;

pub(crate) fn compress_block(rgba: &[[u8; 4]; 16], mask: u16, params: &Params, block: &mut [u8]) {
    let (alpha_block, colour_block) = block[..BLOCK_SIZE].split_at_mut(8);
    compress_colour_block(rgba, mask, params, false, colour_block);
    alpha::compress_bc2(rgba, mask, alpha_block);
}

pub(crate) fn decompress_block(block: &[u8]) -> [[u8; 4]; 16] {
    let mut rgba = colourblock::decompress(&block[8..BLOCK_SIZE], false);
    alpha::decompress_bc2(&mut rgba, &block[..8]);
    rgba
}
