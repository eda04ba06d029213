use crate::data::Word;
use crate::data::NUM_LETTERS;
use std::fmt;
use std::iter::zip;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of letters in every word.
pub const WORD_LENGTH: usize = 5;

/// The number of distinct feedback patterns for a word of [`WORD_LENGTH`] letters (3^5).
pub const NUM_PATTERNS: usize = 243;

/// The result of a given letter at a specific location.
///
/// Results are ordered by their base-3 digit: `Miss < Present < Hit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LetterResult {
    /// The letter does not occupy this location, after accounting for how many times it appears
    /// in the secret.
    Miss,
    /// The letter is in the secret, but not at this location.
    Present,
    /// The letter is correct and at this location.
    Hit,
}

impl LetterResult {
    /// The digit used for this result when a pattern is encoded in base 3.
    pub fn digit(self) -> u8 {
        match self {
            LetterResult::Miss => 0,
            LetterResult::Present => 1,
            LetterResult::Hit => 2,
        }
    }

    fn from_digit(digit: u8) -> LetterResult {
        match digit {
            2 => LetterResult::Hit,
            1 => LetterResult::Present,
            _ => LetterResult::Miss,
        }
    }

    /// The canonical symbol: `G` for a hit, `A` for present, and `X` for a miss.
    pub fn symbol(self) -> char {
        match self {
            LetterResult::Miss => 'X',
            LetterResult::Present => 'A',
            LetterResult::Hit => 'G',
        }
    }

    /// Parses a single feedback symbol.
    ///
    /// Accepts `G`/`A`/`X` in either case, as well as `Y` for present and `.` for a miss.
    pub fn from_symbol(symbol: char) -> Result<LetterResult, WordleError> {
        match symbol.to_ascii_uppercase() {
            'G' => Ok(LetterResult::Hit),
            'A' | 'Y' => Ok(LetterResult::Present),
            'X' | '.' => Ok(LetterResult::Miss),
            _ => Err(WordleError::InvalidFeedbackSymbol(symbol)),
        }
    }
}

/// Indicates that an error occurred while handling words, feedback or constraints.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum WordleError {
    /// A word or pattern had the wrong number of letters.
    #[error("expected {expected} letters, but found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A word contained something other than the letters `A` to `Z`.
    #[error("'{0}' is not a letter from A to Z")]
    InvalidLetter(char),
    /// A feedback pattern contained an unknown symbol.
    #[error("'{0}' is not a feedback symbol, use G, A or X")]
    InvalidFeedbackSymbol(char),
    /// A location outside of the word was referenced.
    #[error("location {0} is outside of the word")]
    InvalidPosition(usize),
    /// New feedback contradicts a letter already known to be at a location. This usually means
    /// that a result was recorded incorrectly.
    #[error("location {position} is already known to be '{existing}', so it cannot be '{proposed}'")]
    Conflict {
        position: usize,
        existing: char,
        proposed: char,
    },
    /// A letter was recorded as both present in the word and absent from it.
    #[error("'{0}' cannot be both present in and absent from the word")]
    Contradiction(char),
    /// Reading a word list failed.
    #[error("failed to read words: {0}")]
    Io(String),
}

impl From<std::io::Error> for WordleError {
    fn from(error: std::io::Error) -> Self {
        WordleError::Io(error.to_string())
    }
}

/// The feedback for every letter of one guess, in the same letter order as the guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct FeedbackPattern {
    results: [LetterResult; WORD_LENGTH],
}

impl FeedbackPattern {
    pub fn new(results: [LetterResult; WORD_LENGTH]) -> FeedbackPattern {
        FeedbackPattern { results }
    }

    /// Builds a pattern from a slice, which must have exactly [`WORD_LENGTH`] results.
    pub fn from_results(results: &[LetterResult]) -> Result<FeedbackPattern, WordleError> {
        let results: [LetterResult; WORD_LENGTH] =
            results
                .try_into()
                .map_err(|_| WordleError::LengthMismatch {
                    expected: WORD_LENGTH,
                    actual: results.len(),
                })?;
        Ok(FeedbackPattern { results })
    }

    /// Decodes a pattern from its base-3 index. Returns `None` if `index >= NUM_PATTERNS`.
    pub fn from_index(index: u8) -> Option<FeedbackPattern> {
        if index as usize >= NUM_PATTERNS {
            return None;
        }
        let mut remainder = index;
        let mut results = [LetterResult::Miss; WORD_LENGTH];
        for result in &mut results {
            *result = LetterResult::from_digit(remainder % 3);
            remainder /= 3;
        }
        Some(FeedbackPattern { results })
    }

    /// Every possible pattern, in index order.
    pub fn all() -> impl Iterator<Item = FeedbackPattern> {
        (0..NUM_PATTERNS as u8).filter_map(FeedbackPattern::from_index)
    }

    /// Encodes this pattern in base 3, with location 0 as the least significant digit.
    pub fn index(&self) -> u8 {
        self.results
            .iter()
            .rev()
            .fold(0, |acc, result| acc * 3 + result.digit())
    }

    pub fn results(&self) -> &[LetterResult; WORD_LENGTH] {
        &self.results
    }

    pub fn get(&self, location: usize) -> Option<LetterResult> {
        self.results.get(location).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LetterResult> {
        self.results.iter()
    }

    /// Returns `true` iff every letter was a hit.
    pub fn is_solved(&self) -> bool {
        self.results.iter().all(|result| *result == LetterResult::Hit)
    }
}

impl fmt::Display for FeedbackPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            write!(f, "{}", result.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for FeedbackPattern {
    type Err = WordleError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let results = pattern
            .trim()
            .chars()
            .map(LetterResult::from_symbol)
            .collect::<Result<Vec<LetterResult>, WordleError>>()?;
        FeedbackPattern::from_results(&results)
    }
}

impl From<FeedbackPattern> for String {
    fn from(pattern: FeedbackPattern) -> Self {
        pattern.to_string()
    }
}

impl TryFrom<String> for FeedbackPattern {
    type Error = WordleError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        pattern.parse()
    }
}

/// Determines the feedback for `guess` when the secret word is `secret`.
///
/// Hits are assigned first and consume their letter from the secret. Only the letters left over
/// can then be reported as present, so a repeated letter in the guess is never reported more
/// times than it appears in the secret.
pub fn get_feedback(guess: &Word, secret: &Word) -> FeedbackPattern {
    let mut results = [LetterResult::Miss; WORD_LENGTH];
    let mut remaining = [0u8; NUM_LETTERS];
    for (index, (guess_letter, secret_letter)) in zip(guess.indices(), secret.indices()).enumerate()
    {
        if guess_letter == secret_letter {
            results[index] = LetterResult::Hit;
        } else {
            remaining[secret_letter as usize] += 1;
        }
    }
    for (index, guess_letter) in guess.indices().into_iter().enumerate() {
        if results[index] == LetterResult::Hit {
            continue;
        }
        let count = &mut remaining[guess_letter as usize];
        if *count > 0 {
            results[index] = LetterResult::Present;
            *count -= 1;
        }
    }
    FeedbackPattern { results }
}

/// Parses both words and determines the feedback for `guess` against `secret`.
pub fn get_feedback_for_strs(guess: &str, secret: &str) -> Result<FeedbackPattern, WordleError> {
    let guess = Word::new(guess)?;
    let secret = Word::new(secret)?;
    Ok(get_feedback(&guess, &secret))
}

/// Whether the game was won or lost by the guesser.
#[derive(Debug, Eq, PartialEq)]
pub enum GameResult {
    /// Indicates that the guesser won the game, and provides the guesses that were given.
    Success(Vec<Word>),
    /// Indicates that the guesser failed to guess the word, and provides the guesses that were given.
    Failure(Vec<Word>),
    /// Indicates that the given word was not among the possible words.
    UnknownWord,
}
