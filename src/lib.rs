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

//! A pure Rust BC1/2/3 compressor and decompressor based on Simon Brown's
//! **libsquish**.
//!
//! BCn formats are laid out in blocks covering 4x4 pixels:
//! * BC1: colour with optional 1-bit alpha, 8 bytes
//! * BC2: explicit 4-bit alpha, colour, 16 bytes
//! * BC3: interpolated alpha, colour, 16 bytes
//!
//! ```
//! use texsquish::{Format, Params};
//!
//! let rgba = vec![0x80u8; 8 * 8 * 4];
//! let blocks = Format::Bc1.compress_to_vec(&rgba, 8, 8, Params::default())?;
//! assert_eq!(blocks.len(), 32);
//!
//! let decoded = Format::Bc1.decompress_to_vec(&blocks, 8, 8)?;
//! assert_eq!(decoded.len(), rgba.len());
//! # Ok::<(), texsquish::Error>(())
//! ```
//!
//! Images are processed row of blocks by row of blocks; enable the `rayon`
//! feature to spread the rows over a thread pool. Without the default `std`
//! feature the crate is `no_std` and only needs `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod alpha;
mod bc1;
mod bc2;
mod bc3;
mod colourblock;
mod colourfit;
mod colourset;
mod error;
mod flags;
mod format;
mod image;
mod math;
mod simd;

use tracing::trace;

use crate::colourfit::ColourFit;
use crate::colourset::ColourSet;

pub use error::{Buffer, Error, Result};
pub use flags::Flags;
pub use format::Format;
pub use image::block_mask;

/// Defines a compression algorithm
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Fast, low quality
    RangeFit,

    /// Slow, high quality
    ClusterFit,

    /// Very slow, very high quality
    IterativeClusterFit,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::ClusterFit
    }
}

/// RGB colour channel weights for use in block fitting
pub type ColourWeights = [f32; 3];

/// Uniform weights for each colour channel
pub const COLOUR_WEIGHTS_UNIFORM: ColourWeights = [1.0, 1.0, 1.0];

/// Weights based on the perceived brightness of each colour channel
pub const COLOUR_WEIGHTS_PERCEPTUAL: ColourWeights = [0.2126, 0.7152, 0.0722];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
    /// The compression algorithm to be used
    pub algorithm: Algorithm,

    /// Weigh the relative importance of each colour channel when fitting
    /// (defaults to perceptual weights)
    ///
    /// The weights only steer which endpoints win; the 5:6:5 precision of
    /// the endpoints is the same for any weighting.
    pub weights: ColourWeights,

    /// Weigh colour by alpha during cluster fit (defaults to false)
    ///
    /// This can significantly increase perceived quality for images that are rendered
    /// using alpha blending.
    pub weigh_colour_by_alpha: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            algorithm: Algorithm::default(),
            weights: COLOUR_WEIGHTS_PERCEPTUAL,
            weigh_colour_by_alpha: false,
        }
    }
}

/// Fits and writes the 8-byte colour part of a block.
///
/// * `rgba`   - The uncompressed block of pixels
/// * `mask`   - The valid pixel mask
/// * `params` - Additional compressor parameters
/// * `is_bc1` - Allow the 3-colour mode and drop texels with alpha below 128
/// * `block`  - Storage for the colour block
fn compress_colour_block(
    rgba: &[[u8; 4]; 16],
    mask: u16,
    params: &Params,
    is_bc1: bool,
    block: &mut [u8],
) {
    // create the minimal point set
    let colours = ColourSet::new(rgba, mask, is_bc1, params.weigh_colour_by_alpha);

    // compress with the appropriate fitting strategy
    let mut fit = ColourFit::new(&colours, params);
    trace!(strategy = fit.name(), points = colours.count(), "fitting colour block");
    fit.compress(is_bc1, block);
}
