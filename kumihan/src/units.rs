// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Number of layout units per device pixel.
pub const SCALE: i32 = 1024;

/// Converts layout units to device pixels, rounding to nearest.
pub const fn pixels(units: i32) -> i32 {
    (units + SCALE / 2) >> 10
}

/// Converts device pixels to layout units.
pub const fn from_pixels(px: i32) -> i32 {
    px * SCALE
}
