use serde::{Deserialize, Serialize};

/// Player slot color, assigned by slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for PlayerColor {
    fn default() -> Self {
        Self::PALETTE[0]
    }
}

impl PlayerColor {
    /// One color per competing slot.
    pub const PALETTE: &[PlayerColor] = &[
        PlayerColor {
            r: 255,
            g: 255,
            b: 255,
        }, // White
        PlayerColor {
            r: 255,
            g: 87,
            b: 87,
        }, // Red
        PlayerColor {
            r: 83,
            g: 152,
            b: 255,
        }, // Blue
        PlayerColor {
            r: 46,
            g: 213,
            b: 115,
        }, // Green
    ];

    /// Color for a slot index, wrapping around the palette.
    pub fn for_slot(slot: usize) -> Self {
        Self::PALETTE[slot % Self::PALETTE.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_get_distinct_colors() {
        let colors: Vec<_> = (0..4).map(PlayerColor::for_slot).collect();
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                assert_ne!(colors[i], colors[j], "slots {i} and {j} share a color");
            }
        }
    }

    #[test]
    fn slot_index_wraps() {
        assert_eq!(PlayerColor::for_slot(4), PlayerColor::for_slot(0));
    }
}
