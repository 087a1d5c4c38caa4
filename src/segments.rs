// This library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this library.  If not, see <http://www.gnu.org/licenses/>.
//! 7-segment glyphs and per-digit brightness compensation.
//!
//! ```text
//!      A
//!     ----
//!  F |    | B
//!    | G  |
//!     ----
//!  E |    | C
//!    |    |
//!     ----  . DP
//!      D
//! ```
//!
//! The segments share one current path with no limiting resistors, so a digit
//! with more segments lit looks dimmer.  Each digit is held on longer in
//! proportion to its segment count to even that out.

/// Segment bitmask, bit 0 = A through bit 6 = G, bit 7 = DP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph(u8);

pub const SEG_A: u8 = 1 << 0;
pub const SEG_B: u8 = 1 << 1;
pub const SEG_C: u8 = 1 << 2;
pub const SEG_D: u8 = 1 << 3;
pub const SEG_E: u8 = 1 << 4;
pub const SEG_F: u8 = 1 << 5;
pub const SEG_G: u8 = 1 << 6;
pub const SEG_DP: u8 = 1 << 7;

#[rustfmt::skip]
const DIGITS: [u8; 10] = [
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,         // 0
    SEG_B | SEG_C,                                         // 1
    SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,                 // 2
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,                 // 3
    SEG_B | SEG_C | SEG_F | SEG_G,                         // 4
    SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,                 // 5
    SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,         // 6
    SEG_A | SEG_B | SEG_C,                                 // 7
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G, // 8
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,         // 9
];

/// Lit segments per decimal digit, used for brightness compensation.
pub const SEGMENT_COUNT: [u8; 10] = [6, 2, 5, 5, 4, 5, 6, 3, 7, 6];

impl Glyph {
    pub const BLANK: Glyph = Glyph(0);

    /// The two colon dots hang off the A and B lines of the colon position.
    pub const COLON: Glyph = Glyph(SEG_A | SEG_B);

    /// Glyph for a decimal digit; anything above 9 is blank.
    #[must_use]
    pub fn digit(value: u8) -> Glyph {
        DIGITS
            .get(usize::from(value))
            .map_or(Glyph::BLANK, |&bits| Glyph(bits))
    }

    /// Whether `segment` (one of the `SEG_*` masks) is lit.
    pub fn lit(self, segment: u8) -> bool {
        self.0 & segment != 0
    }
}

/// Time to hold `digit` on: `base_us * (1 + 0.2 * segments)`, in whole
/// microseconds.  Non-digits get zero segments and therefore `base_us`.
pub fn on_time_us(digit: u8, base_us: u16) -> u32 {
    let segments = SEGMENT_COUNT
        .get(usize::from(digit))
        .copied()
        .unwrap_or(0);
    u32::from(base_us) * (5 + u32::from(segments)) / 5
}
