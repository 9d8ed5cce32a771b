// Minimal linear algebra for scene transforms.
//
// Hand-rolled on purpose: the arena needs only a 3-vector and a 3×3 rotation
// matrix built from Euler angles, and pulling in a full math crate for that
// would be the heaviest dependency in the workspace. Rotation composition
// uses the fixed X-then-Y-then-Z convention throughout the project.

use serde::{Deserialize, Serialize};

/// A 3-component float vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    /// Component-wise product (used for scale chains).
    pub fn mul(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }
}

/// A 3×3 matrix, row-major.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat3 {
    pub rows: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Rotation from Euler angles in radians, applied X then Y then Z.
    pub fn from_euler(angles: Vec3) -> Mat3 {
        let (sx, cx) = angles.x.sin_cos();
        let (sy, cy) = angles.y.sin_cos();
        let (sz, cz) = angles.z.sin_cos();

        let rx = Mat3 {
            rows: [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]],
        };
        let ry = Mat3 {
            rows: [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]],
        };
        let rz = Mat3 {
            rows: [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]],
        };
        rz.mul_mat(ry.mul_mat(rx))
    }

    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        let r = &self.rows;
        Vec3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }

    pub fn mul_mat(&self, other: Mat3) -> Mat3 {
        let mut rows = [[0.0f32; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[i][k] * other.rows[k][j]).sum();
            }
        }
        Mat3 { rows }
    }
}

/// Degrees to radians.
pub fn rad(degrees: f32) -> f32 {
    degrees.to_radians()
}
