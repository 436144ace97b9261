//! Character categories driving the scanner's transition table

/// Input category of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterCategory {
    /// Any alphabetic character
    Letter = 0,
    /// Whitespace
    Delimiter = 1,
    /// `(` or `{`
    Open = 2,
    /// `)` or `}`
    Close = 3,
    /// Digits, underscores and everything else
    Other = 4,
}

impl CharacterCategory {
    /// Number of categories, i.e. the column count of the transition table
    pub const COUNT: usize = 5;

    pub fn classify(ch: char) -> Self {
        match ch {
            '(' | '{' => Self::Open,
            ')' | '}' => Self::Close,
            c if c.is_alphabetic() => Self::Letter,
            c if c.is_whitespace() => Self::Delimiter,
            _ => Self::Other,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::Delimiter => "delimiter",
            Self::Open => "open",
            Self::Close => "close",
            Self::Other => "other",
        }
    }
}
