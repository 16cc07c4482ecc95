//! Nybble-lane kernel for NybbleLife.
//!
//! A group is one `u64` holding 16 horizontally adjacent cells as 4-bit
//! lanes, most significant lane first. Bit 0 of a lane is the most recently
//! computed state and bit 1 the state one generation older. Bits 2-3 stay
//! zero so per-lane neighbourhood sums (at most 9) never carry into the
//! next lane.
//!
//! The row driver keeps a three-wide sliding window of column sums so each
//! group is extracted once and written once per generation.

pub const LANE_BITS: u32 = 4;
pub const CELLS_PER_GROUP: usize = 64 / LANE_BITS as usize;

/// Bit 0 of every lane.
pub const LOW_BIT_MASK: u64 = 0x1111_1111_1111_1111;
/// Bits 0-1 of every lane: the only bits a committed word may carry.
pub const HISTORY_MASK: u64 = 0x3333_3333_3333_3333;
/// Bits 2-3 of every lane, complemented into the candidate state.
const TAG_MASK: u64 = 0xCCCC_CCCC_CCCC_CCCC;
/// Distance between the lowest and highest lane of a group.
const EDGE_SHIFT: u32 = 64 - LANE_BITS;

/// Which generation bit to read out of a neighbouring row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryBit {
    /// Bit 0: the row has not been advanced yet this generation.
    Current,
    /// Bit 1: the row was already advanced, its old state moved up one bit.
    Previous,
}

impl HistoryBit {
    #[inline(always)]
    const fn shift(self) -> u32 {
        match self {
            HistoryBit::Current => 0,
            HistoryBit::Previous => 1,
        }
    }
}

/// How the rows above and below are read while advancing one row.
///
/// The choice depends on whether each neighbour row has already been
/// committed in the current generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowReads {
    pub above: HistoryBit,
    pub below: HistoryBit,
}

impl RowReads {
    /// Top-to-bottom sweep: the row above is done, the row below is not.
    pub const TOP_DOWN: RowReads = RowReads {
        above: HistoryBit::Previous,
        below: HistoryBit::Current,
    };
    /// Neither neighbour has been advanced yet.
    pub const UNTOUCHED_NEIGHBORS: RowReads = RowReads {
        above: HistoryBit::Current,
        below: HistoryBit::Current,
    };
    /// Both neighbours have already been advanced.
    pub const ADVANCED_NEIGHBORS: RowReads = RowReads {
        above: HistoryBit::Previous,
        below: HistoryBit::Previous,
    };
}

#[inline(always)]
pub fn lane_bits(word: u64, bit: HistoryBit) -> u64 {
    (word >> bit.shift()) & LOW_BIT_MASK
}

/// Extract group `group` of a row.
///
/// Returns `(self_lanes, column_sums)`: the current bit of every lane, and
/// per lane the sum of the cell above, the cell itself and the cell below.
/// Each column sum is at most 3.
#[inline(always)]
pub fn column_sums(
    above: &[u64],
    row: &[u64],
    below: &[u64],
    group: usize,
    reads: RowReads,
) -> (u64, u64) {
    let self_lanes = row[group] & LOW_BIT_MASK;
    let top = lane_bits(above[group], reads.above);
    let bottom = lane_bits(below[group], reads.below);
    (self_lanes, self_lanes + top + bottom)
}

/// Column sums of the column one to the left of each lane.
///
/// The leftmost lane takes the rightmost lane of the previous group; a zero
/// `prev_sums` yields 0 there (no wraparound).
#[inline(always)]
pub fn left_neighbors(curr_sums: u64, prev_sums: u64) -> u64 {
    (curr_sums >> LANE_BITS) | (prev_sums << EDGE_SHIFT)
}

/// Column sums of the column one to the right of each lane.
#[inline(always)]
pub fn right_neighbors(curr_sums: u64, next_sums: u64) -> u64 {
    (curr_sums << LANE_BITS) | (next_sums >> EDGE_SHIFT)
}

/// B3/S23 for all 16 lanes at once.
///
/// `window_sums` is the per-lane 3x3 sum including the cell itself (0..=9),
/// `self_lanes` the current bit of each lane. A lane ends with bit 0 set
/// exactly when its neighbour count is 3, or 2 with the cell alive: in both
/// cases `count | self == 3`, which the tag complement turns into `0xF`.
#[inline(always)]
pub fn next_state_bits(window_sums: u64, self_lanes: u64) -> u64 {
    // Every lane of the window includes its own cell, so nothing borrows.
    let mut state = window_sums - self_lanes;
    state |= self_lanes;
    state ^= TAG_MASK;
    state &= state >> 2;
    state &= state >> 1;
    state & LOW_BIT_MASK
}

/// Build the committed word: old state into bit 1, new state into bit 0.
#[inline(always)]
pub fn commit(self_lanes: u64, next_bits: u64) -> u64 {
    ((self_lanes & LOW_BIT_MASK) << 1) | (next_bits & LOW_BIT_MASK)
}

/// Lanes of the last real group that hold grid cells (full 4-bit lanes).
pub const fn tail_lane_mask(cols: usize) -> u64 {
    let used = cols % CELLS_PER_GROUP;
    if used == 0 {
        u64::MAX
    } else {
        !(u64::MAX >> (used as u32 * LANE_BITS))
    }
}

/// Advance one row in place.
///
/// `above`, `row` and `below` are full rows including the trailing padding
/// group. Group `g` is extracted one iteration before it is finalized, so
/// the window `prev/curr/next` is complete when its result is written.
/// Lanes outside `tail_mask` in the last real group are forced dead.
#[inline]
pub fn advance_row(above: &[u64], row: &mut [u64], below: &[u64], reads: RowReads, tail_mask: u64) {
    let groups = row.len();
    debug_assert!(groups >= 2, "a row needs one real group and the padding group");
    debug_assert_eq!(above.len(), groups);
    debug_assert_eq!(below.len(), groups);

    let (mut next_self, mut next_sums) = column_sums(above, row, below, 0, reads);
    let mut curr_sums = 0u64;

    for group in 1..groups {
        let prev_sums = curr_sums;
        curr_sums = next_sums;
        let curr_self = next_self;
        (next_self, next_sums) = column_sums(above, row, below, group, reads);

        let left = left_neighbors(curr_sums, prev_sums);
        let right = right_neighbors(curr_sums, next_sums);
        let next_bits = next_state_bits(curr_sums + left + right, curr_self);

        row[group - 1] = commit(curr_self, next_bits);
    }

    row[groups - 2] &= tail_mask;
}
