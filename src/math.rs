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

use core::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    x: f32,
    y: f32,
    z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub const fn splat(s: f32) -> Self {
        Vec3 { x: s, y: s, z: s }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn dot(&self, other: &Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    pub fn min(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    pub fn max(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// Rounds every component towards zero
    pub fn truncate(&self) -> Vec3 {
        Vec3::new(libm::truncf(self.x), libm::truncf(self.y), libm::truncf(self.z))
    }

    /// Clamps to [0, 1] and snaps every component to the 5:6:5 grid
    pub fn clamp_to_grid(&self) -> Vec3 {
        let clamped = self.max(&Vec3::splat(0.0)).min(&Vec3::splat(1.0));
        (GRID * clamped + Vec3::splat(0.5)).truncate() * GRID_RCP
    }
}

/// Number of representable steps per channel of a 5:6:5 colour
pub const GRID: Vec3 = Vec3::new(31.0, 63.0, 31.0);
pub const GRID_RCP: Vec3 = Vec3::new(1.0 / 31.0, 1.0 / 63.0, 1.0 / 31.0);

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Vec3) {
        *self = *self - other;
    }
}

impl Mul for Vec3 {
    type Output = Vec3;

    fn mul(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, s: f32) {
        *self = *self * s;
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;

    fn div(self, s: f32) -> Vec3 {
        self * (1.0 / s)
    }
}

impl DivAssign<f32> for Vec3 {
    fn div_assign(&mut self, s: f32) {
        *self = *self / s;
    }
}

/// Upper triangle of a symmetric 3x3 matrix, row-major:
/// `[xx, xy, xz, yy, yz, zz]`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sym3x3([f32; 6]);

impl Sym3x3 {
    pub fn splat(s: f32) -> Self {
        Sym3x3([s; 6])
    }

    /// Weighted covariance of a point cloud
    pub fn weighted_covariance(points: &[Vec3], weights: &[f32]) -> Self {
        // compute the centroid
        let mut total = 0.0;
        let mut centroid = Vec3::splat(0.0);
        for (p, &w) in points.iter().zip(weights) {
            total += w;
            centroid += w * *p;
        }
        if total > f32::EPSILON {
            centroid /= total;
        }

        // accumulate the covariance matrix
        let mut covariance = Sym3x3::splat(0.0);
        for (p, &w) in points.iter().zip(weights) {
            let a = *p - centroid;
            let b = w * a;

            covariance[0] += a.x * b.x;
            covariance[1] += a.x * b.y;
            covariance[2] += a.x * b.z;
            covariance[3] += a.y * b.y;
            covariance[4] += a.y * b.z;
            covariance[5] += a.z * b.z;
        }

        covariance
    }

    /// Eigenvector of the largest eigenvalue, computed by solving the
    /// characteristic cubic in closed form. Not normalised.
    pub fn principle_component(&self) -> Vec3 {
        let m = &self.0;

        // compute the cubic coefficients
        let c0 = m[0] * m[3] * m[5] + 2.0 * m[1] * m[2] * m[4]
            - m[0] * m[4] * m[4]
            - m[3] * m[2] * m[2]
            - m[5] * m[1] * m[1];
        let c1 = m[0] * m[3] + m[0] * m[5] + m[3] * m[5]
            - m[1] * m[1]
            - m[2] * m[2]
            - m[4] * m[4];
        let c2 = m[0] + m[3] + m[5];

        // compute the quadratic coefficients
        let a = c1 - (1.0 / 3.0) * c2 * c2;
        let b = (-2.0 / 27.0) * c2 * c2 * c2 + (1.0 / 3.0) * c1 * c2 - c0;

        // compute the root count check
        let q = 0.25 * b * b + (1.0 / 27.0) * a * a * a;

        if f32::EPSILON < q {
            // only one root, which implies we have a multiple of the identity
            Vec3::splat(1.0)
        } else if q < -f32::EPSILON {
            // three distinct roots
            let theta = libm::atan2f(libm::sqrtf(-q), -0.5 * b);
            let rho = libm::sqrtf(0.25 * b * b - q);

            let rt = libm::powf(rho, 1.0 / 3.0);
            let ct = libm::cosf(theta / 3.0);
            let st = libm::sinf(theta / 3.0);
            let sqrt3 = libm::sqrtf(3.0);

            let mut l1 = (1.0 / 3.0) * c2 + 2.0 * rt * ct;
            let l2 = (1.0 / 3.0) * c2 - rt * (ct + sqrt3 * st);
            let l3 = (1.0 / 3.0) * c2 - rt * (ct - sqrt3 * st);

            // pick the larger
            if libm::fabsf(l2) > libm::fabsf(l1) {
                l1 = l2;
            }
            if libm::fabsf(l3) > libm::fabsf(l1) {
                l1 = l3;
            }

            self.multiplicity1_evector(l1)
        } else {
            // two roots
            let rt = if b < 0.0 {
                -libm::powf(-0.5 * b, 1.0 / 3.0)
            } else {
                libm::powf(0.5 * b, 1.0 / 3.0)
            };

            // l1 is the repeated root
            let l1 = (1.0 / 3.0) * c2 + rt;
            let l2 = (1.0 / 3.0) * c2 - 2.0 * rt;

            if libm::fabsf(l1) > libm::fabsf(l2) {
                self.multiplicity2_evector(l1)
            } else {
                self.multiplicity1_evector(l2)
            }
        }
    }

    fn shifted(&self, evalue: f32) -> Sym3x3 {
        let mut m = *self;
        m[0] -= evalue;
        m[3] -= evalue;
        m[5] -= evalue;
        m
    }

    fn multiplicity1_evector(&self, evalue: f32) -> Vec3 {
        let m = self.shifted(evalue);

        // cofactors of M
        let u = Sym3x3([
            m[3] * m[5] - m[4] * m[4],
            m[2] * m[4] - m[1] * m[5],
            m[1] * m[4] - m[2] * m[3],
            m[0] * m[5] - m[2] * m[2],
            m[1] * m[2] - m[4] * m[0],
            m[0] * m[3] - m[1] * m[1],
        ]);

        // pick the column with the largest component
        match u.largest_component() {
            0 => Vec3::new(u[0], u[1], u[2]),
            1 | 3 => Vec3::new(u[1], u[3], u[4]),
            _ => Vec3::new(u[2], u[4], u[5]),
        }
    }

    fn multiplicity2_evector(&self, evalue: f32) -> Vec3 {
        let m = self.shifted(evalue);

        // pick the first eigenvector based on the largest component
        match m.largest_component() {
            0 | 1 => Vec3::new(-m[1], m[0], 0.0),
            2 => Vec3::new(m[2], 0.0, -m[0]),
            3 | 4 => Vec3::new(0.0, -m[4], m[3]),
            _ => Vec3::new(0.0, -m[5], m[4]),
        }
    }

    fn largest_component(&self) -> usize {
        let mut mc = libm::fabsf(self[0]);
        let mut mi = 0;
        for i in 1..6 {
            let c = libm::fabsf(self[i]);
            if c > mc {
                mc = c;
                mi = i;
            }
        }
        mi
    }
}

impl Index<usize> for Sym3x3 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Sym3x3 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.0[index]
    }
}

/// Rounds to nearest (for non-negative input) and clamps to `[0, limit]`
pub fn float_to_int(a: f32, limit: i32) -> i32 {
    // truncating cast after adding a half gives round-to-nearest
    let i = (a + 0.5) as i32;
    i.clamp(0, limit)
}
