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

//! Errors returned when a caller's buffers do not fit the requested operation.

use core::fmt;
use thiserror::Error;

/// Which caller-supplied buffer failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    /// The source pixels or source blocks
    Input,
    /// The destination for compressed blocks or decompressed pixels
    Output,
    /// A single compressed block
    Block,
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Buffer::Input => "Input",
            Buffer::Output => "Output",
            Buffer::Block => "Block",
        })
    }
}

/// Errors that can occur during compression or decompression.
///
/// All checks run before any block is touched, so a failed call leaves the
/// output untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A buffer is smaller than the image dimensions and format require.
    #[error("{buffer} buffer too small: need {needed} bytes, but only {actual} bytes available.")]
    SizeMismatch {
        /// The buffer that was too small
        buffer: Buffer,
        /// The required size in bytes
        needed: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// The image is too large for its size in bytes to be addressable.
    #[error("Image dimensions {width}x{height} overflow the address space.")]
    DimensionOverflow { width: usize, height: usize },
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Fails with [`Error::SizeMismatch`] unless `actual >= needed`
    pub(crate) fn check(buffer: Buffer, needed: usize, actual: usize) -> Result<()> {
        if actual < needed {
            Err(Error::SizeMismatch { buffer, needed, actual })
        } else {
            Ok(())
        }
    }
}
