// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `LinearRgba` color type and associated operations.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Represents a color in a **linear RGBA** color space using `f32` components.
///
/// This is the only color representation in Tessera: node colors, per-point
/// colors of point clouds and render vertices all use it. Alpha doubles as the
/// node opacity, so fading a node means scaling `a`.
///
/// `#[repr(C)]` ensures a consistent memory layout, which is important when
/// handing vertex colors to a renderer.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    // --- Common Color Constants ---

    /// Opaque red (`[1.0, 0.0, 0.0, 1.0]`).
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green (`[0.0, 1.0, 0.0, 1.0]`).
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue (`[0.0, 0.0, 1.0, 1.0]`).
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque yellow (`[1.0, 1.0, 0.0, 1.0]`).
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Opaque white (`[1.0, 1.0, 1.0, 1.0]`).
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black (`[0.0, 0.0, 0.0, 0.0]`).
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new `LinearRgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `LinearRgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns the components as `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

// --- sRGB decoding ---
/// Converts an sRGB component to linear space.
#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// --- Conversions ---
impl LinearRgba {
    /// Creates a `LinearRgba` from an sRGB hex string (`#RRGGBB` or `#RRGGBBAA`).
    ///
    /// The RGB channels are converted to linear space. Alpha is normalized but
    /// not gamma corrected. Malformed channels read as zero (alpha as opaque).
    ///
    /// # Example
    /// ```
    /// use tessera_core::math::color::LinearRgba;
    /// let color = LinearRgba::from_hex("#FFFFFF");
    /// assert!((color.r - 1.0).abs() < 1e-6);
    /// assert_eq!(color.a, 1.0);
    /// ```
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>, fallback: u8| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .unwrap_or(fallback) as f32
                / 255.0
        };
        Self {
            r: srgb_to_linear(channel(0..2, 0)),
            g: srgb_to_linear(channel(2..4, 0)),
            b: srgb_to_linear(channel(4..6, 0)),
            a: channel(6..8, 255),
        }
    }
}

// --- Manipulations ---
impl LinearRgba {
    /// Returns a new color with the same RGB components but a different alpha.
    #[inline]
    pub fn with_alpha(&self, a: f32) -> Self {
        Self { a, ..*self }
    }

    /// Linearly interpolates between two colors.
    /// The factor `t` is clamped to `[0.0, 1.0]`.
    #[inline]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: start.r + (end.r - start.r) * t,
            g: start.g + (end.g - start.g) * t,
            b: start.b + (end.b - start.b) * t,
            a: start.a + (end.a - start.a) * t,
        }
    }

    /// Spreads `count` colors evenly through the reference `colors`.
    ///
    /// The first output is the first reference color and the last output is
    /// always the last reference color. An empty reference list yields an
    /// empty gradient.
    ///
    /// # Example
    /// ```
    /// use tessera_core::math::color::LinearRgba;
    /// let g = LinearRgba::gradient(&[LinearRgba::BLACK, LinearRgba::WHITE], 3);
    /// assert_eq!(g[0], LinearRgba::BLACK);
    /// assert_eq!(g[1], LinearRgba::rgb(0.5, 0.5, 0.5));
    /// assert_eq!(g[2], LinearRgba::WHITE);
    /// ```
    pub fn gradient(colors: &[Self], count: usize) -> Vec<Self> {
        match colors {
            [] => Vec::new(),
            [single] => vec![*single; count],
            _ => {
                let last_segment = colors.len() - 2;
                (0..count)
                    .map(|i| {
                        if i + 1 == count {
                            return colors[colors.len() - 1];
                        }
                        let alpha = i as f32 * (colors.len() - 1) as f32
                            / (count.max(2) - 1) as f32;
                        let floor = (alpha.floor() as usize).min(last_segment);
                        Self::lerp(colors[floor], colors[floor + 1], alpha - floor as f32)
                    })
                    .collect()
            }
        }
    }
}

// --- Operator Overloads ---

impl Default for LinearRgba {
    /// Returns opaque white by default.
    #[inline]
    fn default() -> Self {
        Self::WHITE
    }
}

impl Add for LinearRgba {
    type Output = Self;
    /// Adds two colors component-wise.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
            a: self.a + rhs.a,
        }
    }
}

impl Sub for LinearRgba {
    type Output = Self;
    /// Subtracts two colors component-wise.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            r: self.r - rhs.r,
            g: self.g - rhs.g,
            b: self.b - rhs.b,
            a: self.a - rhs.a,
        }
    }
}

impl Mul<f32> for LinearRgba {
    type Output = Self;
    /// Multiplies all components by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self::Output {
        Self {
            r: self.r * scalar,
            g: self.g * scalar,
            b: self.b * scalar,
            a: self.a * scalar,
        }
    }
}
