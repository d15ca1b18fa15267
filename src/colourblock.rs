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

//! The 8-byte colour block shared by BC1, BC2 and BC3: two little-endian
//! 5:6:5 endpoints followed by sixteen 2-bit indices, four per byte with the
//! leftmost texel in the low bits.

use crate::math::{float_to_int, Vec3};

/// Packs a colour in [0, 1] into 5:6:5
pub fn float_to_565(colour: &Vec3) -> u16 {
    // get the components in the correct range
    let r = float_to_int(31.0 * colour.x(), 31) as u16;
    let g = float_to_int(63.0 * colour.y(), 63) as u16;
    let b = float_to_int(31.0 * colour.z(), 31) as u16;

    // pack into a single value
    (r << 11) | (g << 5) | b
}

fn write_colour_block(a: u16, b: u16, indices: &[u8; 16], block: &mut [u8]) {
    // write the endpoints
    block[0..2].copy_from_slice(&a.to_le_bytes());
    block[2..4].copy_from_slice(&b.to_le_bytes());

    // write the indices
    for (byte, row) in block[4..8].iter_mut().zip(indices.chunks_exact(4)) {
        *byte = row[0] | (row[1] << 2) | (row[2] << 4) | (row[3] << 6);
    }
}

/// Writes a block in 3-colour mode, which decoders select when `a <= b`.
/// Index 3 is kept as-is and decodes to transparent black.
pub fn write_colour_block3(start: &Vec3, end: &Vec3, indices: &[u8; 16], block: &mut [u8]) {
    let mut a = float_to_565(start);
    let mut b = float_to_565(end);

    let mut remapped = *indices;
    if a > b {
        // swap a and b
        core::mem::swap(&mut a, &mut b);
        for index in remapped.iter_mut() {
            *index = match *index {
                0 => 1,
                1 => 0,
                other => other,
            };
        }
    }

    write_colour_block(a, b, &remapped, block);
}

/// Writes a block in 4-colour mode, which decoders select when `a > b`.
pub fn write_colour_block4(start: &Vec3, end: &Vec3, indices: &[u8; 16], block: &mut [u8]) {
    let mut a = float_to_565(start);
    let mut b = float_to_565(end);

    let remapped = match a.cmp(&b) {
        core::cmp::Ordering::Less => {
            // swap a and b
            core::mem::swap(&mut a, &mut b);
            indices.map(|index| (index ^ 0x1) & 0x3)
        }
        // a single colour, only index 0 is meaningful
        core::cmp::Ordering::Equal => [0; 16],
        core::cmp::Ordering::Greater => *indices,
    };

    write_colour_block(a, b, &remapped, block);
}

/// Expands a packed 5:6:5 value to 8 bits per channel by bit replication
fn unpack_565(packed: u16) -> [u8; 4] {
    // get the components in the stored range
    let red = ((packed >> 11) & 0x1f) as u8;
    let green = ((packed >> 5) & 0x3f) as u8;
    let blue = (packed & 0x1f) as u8;

    // scale up to 8 bits
    [
        (red << 3) | (red >> 2),
        (green << 2) | (green >> 4),
        (blue << 3) | (blue >> 2),
        255,
    ]
}

/// Decodes a colour block.
///
/// * `block`  - The 8-byte colour block
/// * `is_bc1` - Allow the 3-colour mode with transparent black; BC2/BC3
///   colour blocks are always decoded with four colours
pub fn decompress(block: &[u8], is_bc1: bool) -> [[u8; 4]; 16] {
    // unpack the endpoints
    let a = u16::from_le_bytes([block[0], block[1]]);
    let b = u16::from_le_bytes([block[2], block[3]]);

    let mut codes = [[0u8; 4]; 4];
    codes[0] = unpack_565(a);
    codes[1] = unpack_565(b);

    // generate the midpoints
    let three_colour = is_bc1 && a <= b;
    for i in 0..3 {
        let c = codes[0][i] as u32;
        let d = codes[1][i] as u32;

        if three_colour {
            codes[2][i] = ((c + d) / 2) as u8;
            codes[3][i] = 0;
        } else {
            codes[2][i] = ((2 * c + d) / 3) as u8;
            codes[3][i] = ((c + 2 * d) / 3) as u8;
        }
    }

    // fill in alpha for the intermediate values
    codes[2][3] = 255;
    codes[3][3] = if three_colour { 0 } else { 255 };

    // store out the colours
    let mut rgba = [[0u8; 4]; 16];
    for (i, pixel) in rgba.iter_mut().enumerate() {
        let packed = block[4 + i / 4];
        let index = (packed >> (2 * (i % 4))) & 0x3;
        *pixel = codes[index as usize];
    }

    rgba
}
