//! Scanner states and the fixed transition table

use super::classifier::CharacterCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    Start = 0,
    InIdentifier = 1,
    Accept = 2,
    Error = 3,
}

impl ScanState {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accept | Self::Error)
    }
}

use ScanState::{Accept, Error, InIdentifier, Start};

/// Rows are indexed by `ScanState`, columns by `CharacterCategory`.
/// Terminal rows are all `Error`: the scanner resets to `Start` after an
/// accept and aborts on error, so they are never consulted.
pub const TRANSITION_TABLE: [[ScanState; CharacterCategory::COUNT]; ScanState::COUNT] = [
    // Letter       Delimiter  Open    Close   Other
    [InIdentifier, Start, Accept, Accept, Error],  // Start
    [InIdentifier, Accept, Accept, Accept, Error], // InIdentifier
    [Error, Error, Error, Error, Error],           // Accept
    [Error, Error, Error, Error, Error],           // Error
];

pub fn next_state(state: ScanState, category: CharacterCategory) -> ScanState {
    TRANSITION_TABLE[state.index()][category.index()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use CharacterCategory::*;

    #[test]
    fn test_start_row() {
        assert_eq!(next_state(Start, Letter), InIdentifier);
        assert_eq!(next_state(Start, Delimiter), Start);
        assert_eq!(next_state(Start, Open), Accept);
        assert_eq!(next_state(Start, Close), Accept);
        assert_eq!(next_state(Start, Other), ScanState::Error);
    }

    #[test]
    fn test_identifier_row() {
        assert_eq!(next_state(InIdentifier, Letter), InIdentifier);
        assert_eq!(next_state(InIdentifier, Delimiter), Accept);
        assert_eq!(next_state(InIdentifier, Open), Accept);
        assert_eq!(next_state(InIdentifier, Close), Accept);
        assert_eq!(next_state(InIdentifier, Other), ScanState::Error);
    }

    #[test]
    fn test_terminal_rows_are_sentinels() {
        for state in [Accept, ScanState::Error] {
            assert!(state.is_terminal());
            for category in [Letter, Delimiter, Open, Close, Other] {
                assert_eq!(next_state(state, category), ScanState::Error);
            }
        }
    }
}
