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

//! Four-lane float vector used by the cluster fit.
//!
//! Every operation is a plain per-lane loop over an aligned array, which the
//! compiler lowers to packed SIMD instructions where the target has them.

use core::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use crate::math::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C, align(16))]
pub struct Vec4([f32; 4]);

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Vec4([x, y, z, w])
    }

    pub const fn splat(s: f32) -> Self {
        Vec4([s; 4])
    }

    #[inline]
    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Vec4(self.0.map(f))
    }

    #[inline]
    fn zip(self, other: Vec4, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut out = [0.0; 4];
        for i in 0..4 {
            out[i] = f(self.0[i], other.0[i]);
        }
        Vec4(out)
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.0[0], self.0[1], self.0[2])
    }

    pub fn x(self) -> f32 {
        self.0[0]
    }

    pub fn splat_x(self) -> Self {
        Vec4::splat(self.0[0])
    }

    pub fn splat_y(self) -> Self {
        Vec4::splat(self.0[1])
    }

    pub fn splat_z(self) -> Self {
        Vec4::splat(self.0[2])
    }

    pub fn splat_w(self) -> Self {
        Vec4::splat(self.0[3])
    }

    /// Returns `a * b + c`
    #[inline]
    pub fn multiply_add(a: Vec4, b: Vec4, c: Vec4) -> Vec4 {
        a * b + c
    }

    /// Returns `-(a * b - c)`
    #[inline]
    pub fn negative_multiply_subtract(a: Vec4, b: Vec4, c: Vec4) -> Vec4 {
        c - a * b
    }

    pub fn reciprocal(self) -> Vec4 {
        self.map(|v| 1.0 / v)
    }

    /// Lane-wise minimum; a NaN lane takes the other operand
    pub fn min(self, other: Vec4) -> Vec4 {
        self.zip(other, f32::min)
    }

    /// Lane-wise maximum; a NaN lane takes the other operand
    pub fn max(self, other: Vec4) -> Vec4 {
        self.zip(other, f32::max)
    }

    pub fn truncate(self) -> Vec4 {
        self.map(libm::truncf)
    }

    pub fn any_less_than(self, other: Vec4) -> bool {
        self.0.iter().zip(other.0.iter()).any(|(a, b)| a < b)
    }
}

impl Add for Vec4 {
    type Output = Vec4;

    #[inline]
    fn add(self, other: Vec4) -> Vec4 {
        self.zip(other, |a, b| a + b)
    }
}

impl AddAssign for Vec4 {
    #[inline]
    fn add_assign(&mut self, other: Vec4) {
        *self = *self + other;
    }
}

impl Sub for Vec4 {
    type Output = Vec4;

    #[inline]
    fn sub(self, other: Vec4) -> Vec4 {
        self.zip(other, |a, b| a - b)
    }
}

impl SubAssign for Vec4 {
    #[inline]
    fn sub_assign(&mut self, other: Vec4) {
        *self = *self - other;
    }
}

impl Mul for Vec4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, other: Vec4) -> Vec4 {
        self.zip(other, |a, b| a * b)
    }
}

impl MulAssign for Vec4 {
    #[inline]
    fn mul_assign(&mut self, other: Vec4) {
        *self = *self * other;
    }
}
