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

//! libsquish-compatible option bits.
//!
//! [`Format`] and [`Params`] are the native way to configure the codec; these
//! flags exist for callers that store or forward the classic integer options.

use bitflags::bitflags;

use crate::{Algorithm, Format, Params, COLOUR_WEIGHTS_PERCEPTUAL, COLOUR_WEIGHTS_UNIFORM};

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// BC1 output
        const DXT1 = 1 << 0;
        /// BC2 output
        const DXT3 = 1 << 1;
        /// BC3 output
        const DXT5 = 1 << 2;
        /// Cluster fit (the default fit)
        const COLOUR_CLUSTER_FIT = 1 << 3;
        /// Range fit
        const COLOUR_RANGE_FIT = 1 << 4;
        /// Perceptual channel weights (the default metric)
        const COLOUR_METRIC_PERCEPTUAL = 1 << 5;
        /// Equal channel weights
        const COLOUR_METRIC_UNIFORM = 1 << 6;
        /// Weigh colour by alpha while fitting
        const WEIGHT_COLOUR_BY_ALPHA = 1 << 7;
        /// Iterative cluster fit
        const COLOUR_ITERATIVE_CLUSTER_FIT = 1 << 8;
    }
}

impl Flags {
    const FORMATS: Flags = Flags::DXT1.union(Flags::DXT3).union(Flags::DXT5);
    const FITS: Flags = Flags::COLOUR_CLUSTER_FIT
        .union(Flags::COLOUR_RANGE_FIT)
        .union(Flags::COLOUR_ITERATIVE_CLUSTER_FIT);
    const METRICS: Flags = Flags::COLOUR_METRIC_PERCEPTUAL.union(Flags::COLOUR_METRIC_UNIFORM);

    /// Resolves every option group to exactly one bit.
    ///
    /// A group that does not hold exactly one of its non-default choices
    /// falls back to the default: BC1, cluster fit, perceptual metric.
    /// Unknown bits are dropped.
    pub fn normalized(self) -> Flags {
        let format = match self & Flags::FORMATS {
            f if f == Flags::DXT3 || f == Flags::DXT5 => f,
            _ => Flags::DXT1,
        };
        let fit = match self & Flags::FITS {
            f if f == Flags::COLOUR_RANGE_FIT || f == Flags::COLOUR_ITERATIVE_CLUSTER_FIT => f,
            _ => Flags::COLOUR_CLUSTER_FIT,
        };
        let metric = match self & Flags::METRICS {
            m if m == Flags::COLOUR_METRIC_UNIFORM => m,
            _ => Flags::COLOUR_METRIC_PERCEPTUAL,
        };
        let extra = self & Flags::WEIGHT_COLOUR_BY_ALPHA;

        format | fit | metric | extra
    }

    /// The block format selected by these flags
    pub fn format(self) -> Format {
        let flags = self.normalized();
        if flags.contains(Flags::DXT3) {
            Format::Bc2
        } else if flags.contains(Flags::DXT5) {
            Format::Bc3
        } else {
            Format::Bc1
        }
    }

    /// The fitting parameters selected by these flags
    pub fn params(self) -> Params {
        let flags = self.normalized();
        let algorithm = if flags.contains(Flags::COLOUR_RANGE_FIT) {
            Algorithm::RangeFit
        } else if flags.contains(Flags::COLOUR_ITERATIVE_CLUSTER_FIT) {
            Algorithm::IterativeClusterFit
        } else {
            Algorithm::ClusterFit
        };
        let weights = if flags.contains(Flags::COLOUR_METRIC_UNIFORM) {
            COLOUR_WEIGHTS_UNIFORM
        } else {
            COLOUR_WEIGHTS_PERCEPTUAL
        };

        Params {
            algorithm,
            weights,
            weigh_colour_by_alpha: flags.contains(Flags::WEIGHT_COLOUR_BY_ALPHA),
        }
    }
}

/// Custom channel weights have no flag and map to the perceptual metric.
impl From<(Format, Params)> for Flags {
    fn from((format, params): (Format, Params)) -> Self {
        let mut flags = match format {
            Format::Bc1 => Flags::DXT1,
            Format::Bc2 => Flags::DXT3,
            Format::Bc3 => Flags::DXT5,
        };
        flags |= match params.algorithm {
            Algorithm::RangeFit => Flags::COLOUR_RANGE_FIT,
            Algorithm::ClusterFit => Flags::COLOUR_CLUSTER_FIT,
            Algorithm::IterativeClusterFit => Flags::COLOUR_ITERATIVE_CLUSTER_FIT,
        };
        flags |= if params.weights == COLOUR_WEIGHTS_UNIFORM {
            Flags::COLOUR_METRIC_UNIFORM
        } else {
            Flags::COLOUR_METRIC_PERCEPTUAL
        };
        if params.weigh_colour_by_alpha {
            flags |= Flags::WEIGHT_COLOUR_BY_ALPHA;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Flags::empty(), Flags::DXT1 | Flags::COLOUR_CLUSTER_FIT | Flags::COLOUR_METRIC_PERCEPTUAL)]
    #[case(
        Flags::DXT3 | Flags::DXT5,
        Flags::DXT1 | Flags::COLOUR_CLUSTER_FIT | Flags::COLOUR_METRIC_PERCEPTUAL
    )]
    #[case(
        Flags::DXT5 | Flags::COLOUR_RANGE_FIT,
        Flags::DXT5 | Flags::COLOUR_RANGE_FIT | Flags::COLOUR_METRIC_PERCEPTUAL
    )]
    #[case(
        Flags::COLOUR_RANGE_FIT | Flags::COLOUR_ITERATIVE_CLUSTER_FIT,
        Flags::DXT1 | Flags::COLOUR_CLUSTER_FIT | Flags::COLOUR_METRIC_PERCEPTUAL
    )]
    #[case(
        Flags::DXT3 | Flags::COLOUR_ITERATIVE_CLUSTER_FIT | Flags::COLOUR_METRIC_UNIFORM,
        Flags::DXT3 | Flags::COLOUR_ITERATIVE_CLUSTER_FIT | Flags::COLOUR_METRIC_UNIFORM
    )]
    #[case(
        Flags::COLOUR_METRIC_UNIFORM | Flags::COLOUR_METRIC_PERCEPTUAL | Flags::WEIGHT_COLOUR_BY_ALPHA,
        Flags::DXT1
            | Flags::COLOUR_CLUSTER_FIT
            | Flags::COLOUR_METRIC_PERCEPTUAL
            | Flags::WEIGHT_COLOUR_BY_ALPHA
    )]
    fn test_normalized(#[case] input: Flags, #[case] expected: Flags) {
        assert_eq!(input.normalized(), expected);
        assert_eq!(expected.normalized(), expected);
    }

    #[test]
    fn test_unknown_bits_are_dropped() {
        let flags = Flags::from_bits_retain(0xFFFF_0000 | Flags::DXT5.bits());
        assert_eq!(
            flags.normalized(),
            Flags::DXT5 | Flags::COLOUR_CLUSTER_FIT | Flags::COLOUR_METRIC_PERCEPTUAL
        );
    }

    #[test]
    fn test_typed_round_trip() {
        let params = Params {
            algorithm: Algorithm::IterativeClusterFit,
            weights: COLOUR_WEIGHTS_UNIFORM,
            weigh_colour_by_alpha: true,
        };
        let flags = Flags::from((Format::Bc3, params));
        assert_eq!(flags.format(), Format::Bc3);
        assert_eq!(flags.params(), params);

        let defaults = Flags::empty();
        assert_eq!(defaults.format(), Format::Bc1);
        assert_eq!(defaults.params(), Params::default());
    }
}
