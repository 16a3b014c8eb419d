//! Digit layouts for an 8-position seven-segment display.
//!
//! Positions are numbered right to left: position 0 is the rightmost digit,
//! matching MAX7219-style drivers.

use crate::time::TimeOfDay;
use heapless::Vec;

/// Number of digit positions on the display.
pub const DISPLAY_WIDTH: u8 = 8;

/// Largest price that fits on the display without dropping digits.
pub const MAX_DISPLAYABLE_PRICE: u32 = 99_999_999;

/// Fixed positions for `[tens of hours, hours, tens of minutes, minutes]`.
const TIME_POSITIONS: [u8; 4] = [5, 4, 3, 2];

/// Index into [`TIME_POSITIONS`] that carries the hour/minute separator.
const TIME_SEPARATOR_INDEX: usize = 1;

/// One lit digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitCell {
    /// Display position, 0 = rightmost.
    pub position: u8,
    /// Decimal digit value 0-9.
    pub digit: u8,
    /// Whether the decimal point after this digit is lit.
    pub decimal_point: bool,
}

/// Ordered set of digits to draw for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DigitLayout {
    cells: Vec<DigitCell, { DISPLAY_WIDTH as usize }>,
}

impl DigitLayout {
    /// Layout for `HH.MM` at fixed positions, leading zeros shown.
    pub fn for_time(time: TimeOfDay) -> Self {
        let mut layout = Self::default();
        for (index, (&position, digit)) in TIME_POSITIONS.iter().zip(time.digits()).enumerate() {
            let cell = DigitCell {
                position,
                digit,
                decimal_point: index == TIME_SEPARATOR_INDEX,
            };
            if !layout.push(cell) {
                break;
            }
        }
        layout
    }

    /// Layout for a price, centred on the display.
    ///
    /// Digits are emitted least significant first, starting at
    /// [`centered_start`] and moving one position left per digit. Zero is
    /// drawn as a single `0`. Prices above [`MAX_DISPLAYABLE_PRICE`] are
    /// clamped to it.
    pub fn for_price(price: u32) -> Self {
        let mut remaining = price.min(MAX_DISPLAYABLE_PRICE);
        let mut position = centered_start(digit_count(remaining));
        let mut layout = Self::default();

        loop {
            let cell = DigitCell {
                position,
                digit: (remaining % 10) as u8,
                decimal_point: false,
            };
            remaining /= 10;
            position += 1;
            if !layout.push(cell) || remaining == 0 {
                break;
            }
        }
        layout
    }

    /// Cells in emission order.
    pub fn cells(&self) -> &[DigitCell] {
        &self.cells
    }

    /// Number of lit digits.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell drawn at `position`, if any.
    pub fn cell_at(&self, position: u8) -> Option<&DigitCell> {
        self.cells.iter().find(|cell| cell.position == position)
    }

    /// Appends `cell`; false once every position is taken.
    fn push(&mut self, cell: DigitCell) -> bool {
        self.cells.push(cell).is_ok()
    }
}

/// Number of decimal digits in `value`; zero has one digit.
pub fn digit_count(value: u32) -> u8 {
    let mut count = 1;
    let mut rest = value / 10;
    while rest > 0 {
        count += 1;
        rest /= 10;
    }
    count
}

/// Rightmost position of a centred run of `digits` digits.
///
/// `floor((DISPLAY_WIDTH - digits) / 2)`, saturating at 0 for runs that fill
/// the whole display.
pub fn centered_start(digits: u8) -> u8 {
    DISPLAY_WIDTH.saturating_sub(digits) / 2
}
