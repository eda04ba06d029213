use crate::restrictions::ConstraintStore;
use crate::results::WordleError;
use crate::results::WORD_LENGTH;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::io::BufRead;
use std::ops::Deref;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of letters in the supported alphabet, `A` to `Z`.
pub const NUM_LETTERS: usize = 26;

fn letter_index(letter: char) -> Result<u8, WordleError> {
    if letter.is_ascii_alphabetic() {
        Ok(letter.to_ascii_uppercase() as u8 - b'A')
    } else {
        Err(WordleError::InvalidLetter(letter))
    }
}

fn index_letter(index: u8) -> char {
    (b'A' + index) as char
}

/// A set of the letters `A` to `Z`.
///
/// Letters are case-insensitive. The set displays (and serializes) as its letters in
/// alphabetical order, e.g. `"AEST"`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct LetterSet {
    mask: u32,
}

impl LetterSet {
    /// Creates an empty set.
    pub const fn new() -> LetterSet {
        LetterSet { mask: 0 }
    }

    /// Adds the given letter, returning whether it was newly added.
    pub fn insert(&mut self, letter: char) -> Result<bool, WordleError> {
        let index = letter_index(letter)?;
        let is_new = !self.contains_index(index);
        self.insert_index(index);
        Ok(is_new)
    }

    /// Removes the given letter, returning whether it was present.
    pub fn remove(&mut self, letter: char) -> bool {
        match letter_index(letter) {
            Ok(index) => {
                let was_present = self.contains_index(index);
                self.mask &= !(1 << index);
                was_present
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, letter: char) -> bool {
        letter_index(letter).map_or(false, |index| self.contains_index(index))
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn union(&self, other: LetterSet) -> LetterSet {
        LetterSet {
            mask: self.mask | other.mask,
        }
    }

    pub fn intersection(&self, other: LetterSet) -> LetterSet {
        LetterSet {
            mask: self.mask & other.mask,
        }
    }

    /// Returns the letters in `self` that are not in `other`.
    pub fn difference(&self, other: LetterSet) -> LetterSet {
        LetterSet {
            mask: self.mask & !other.mask,
        }
    }

    pub fn is_disjoint(&self, other: LetterSet) -> bool {
        self.mask & other.mask == 0
    }

    pub fn is_superset(&self, other: LetterSet) -> bool {
        self.mask & other.mask == other.mask
    }

    /// Iterates over the letters in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        (0..NUM_LETTERS as u8)
            .filter(|index| self.contains_index(*index))
            .map(index_letter)
    }

    pub(crate) fn contains_index(&self, index: u8) -> bool {
        self.mask & (1 << index) != 0
    }

    pub(crate) fn insert_index(&mut self, index: u8) {
        self.mask |= 1 << index;
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.iter() {
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

impl fmt::Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LetterSet({:?})", self.to_string())
    }
}

impl FromStr for LetterSet {
    type Err = WordleError;

    fn from_str(letters: &str) -> Result<Self, Self::Err> {
        let mut set = LetterSet::new();
        for letter in letters.chars() {
            set.insert(letter)?;
        }
        Ok(set)
    }
}

impl From<LetterSet> for String {
    fn from(set: LetterSet) -> Self {
        set.to_string()
    }
}

impl TryFrom<String> for LetterSet {
    type Error = WordleError;

    fn try_from(letters: String) -> Result<Self, Self::Error> {
        letters.parse()
    }
}

/// A word of exactly [`WORD_LENGTH`] letters, stored in upper case.
///
/// Words are parsed case-insensitively, and compare, order and hash by their letters.
#[derive(Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct Word {
    letters: [u8; WORD_LENGTH],
    letter_set: LetterSet,
}

impl Word {
    /// Parses a word, converting it to upper case.
    ///
    /// ```
    /// use wordle_minimax::Word;
    ///
    /// let word = Word::new("crane").unwrap();
    /// assert_eq!(word.to_string(), "CRANE");
    /// assert!(Word::new("cranes").is_err());
    /// ```
    pub fn new(word: &str) -> Result<Word, WordleError> {
        let num_letters = word.chars().count();
        if num_letters != WORD_LENGTH {
            return Err(WordleError::LengthMismatch {
                expected: WORD_LENGTH,
                actual: num_letters,
            });
        }
        let mut letters = [0u8; WORD_LENGTH];
        let mut letter_set = LetterSet::new();
        for (slot, letter) in letters.iter_mut().zip(word.chars()) {
            let index = letter_index(letter)?;
            letter_set.insert_index(index);
            *slot = index;
        }
        Ok(Word {
            letters,
            letter_set,
        })
    }

    /// Returns the letter at the given location.
    pub fn letter(&self, location: usize) -> Option<char> {
        self.letters.get(location).map(|index| index_letter(*index))
    }

    /// Iterates over the letters in order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.letters.iter().map(|index| index_letter(*index))
    }

    /// The set of distinct letters in this word.
    pub fn letter_set(&self) -> LetterSet {
        self.letter_set
    }

    pub fn contains(&self, letter: char) -> bool {
        self.letter_set.contains(letter)
    }

    /// Returns `true` iff at least one letter appears more than once.
    pub fn has_repeated_letters(&self) -> bool {
        self.letter_set.len() < WORD_LENGTH
    }

    /// The letters as alphabet indices, where `A` is 0.
    pub(crate) fn indices(&self) -> [u8; WORD_LENGTH] {
        self.letters
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.letters == other.letters
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.letters.hash(state);
    }
}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Word {
    fn cmp(&self, other: &Self) -> Ordering {
        self.letters.cmp(&other.letters)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.chars() {
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:?})", self.to_string())
    }
}

impl FromStr for Word {
    type Err = WordleError;

    fn from_str(word: &str) -> Result<Self, Self::Err> {
        Word::new(word)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.to_string()
    }
}

impl TryFrom<String> for Word {
    type Error = WordleError;

    fn try_from(word: String) -> Result<Self, Self::Error> {
        Word::new(&word)
    }
}

/// Contains all the possible words for this Wordle game.
///
/// Words keep the order they were given in. Duplicates are kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<Word>,
}

impl WordBank {
    /// Constructs a new `WordBank` struct by reading words from the given reader.
    ///
    /// The reader should provide one word per line. Surrounding whitespace and empty lines are
    /// ignored, and each word is converted to upper case.
    pub fn from_reader<R: BufRead>(word_reader: R) -> Result<Self, WordleError> {
        let mut words = Vec::new();
        for maybe_line in word_reader.lines() {
            let line = maybe_line?;
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            words.push(Word::new(word)?);
        }
        Ok(WordBank { words })
    }

    /// Constructs a new `WordBank` struct using the words from the given iterator.
    ///
    /// ```
    /// use wordle_minimax::WordBank;
    ///
    /// let bank = WordBank::from_iterator(&["crane", "", " Slate "]).unwrap();
    /// assert_eq!(bank.len(), 2);
    /// ```
    pub fn from_iterator<S, I>(words: I) -> Result<Self, WordleError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let words = words
            .into_iter()
            .filter_map(|word| {
                let word = word.as_ref().trim();
                if word.is_empty() {
                    return None;
                }
                Some(Word::new(word))
            })
            .collect::<Result<Vec<Word>, WordleError>>()?;
        Ok(WordBank { words })
    }

    /// Returns the number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Deref for WordBank {
    type Target = [Word];

    fn deref(&self) -> &[Word] {
        &self.words
    }
}

impl From<Vec<Word>> for WordBank {
    fn from(words: Vec<Word>) -> Self {
        WordBank { words }
    }
}

/// Returns the words that meet the given constraints, in their original order.
pub fn filter_candidates(words: &[Word], store: &ConstraintStore) -> Vec<Word> {
    words
        .iter()
        .filter(|word| store.satisfies(word))
        .copied()
        .collect()
}

/// Ranks words by how many of the given letters they contain, most first. Words with the same
/// count keep their original order.
pub fn rank_by_letter_coverage(words: &[Word], letters: LetterSet) -> Vec<(Word, usize)> {
    let mut ranked: Vec<(Word, usize)> = words
        .iter()
        .map(|word| (*word, word.letter_set().intersection(letters).len()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Counts the number of words that contain each letter.
#[derive(Clone, Debug)]
pub struct LetterCounter {
    num_words: usize,
    num_words_by_letter: [u32; NUM_LETTERS],
    num_words_by_located_letter: [[u32; NUM_LETTERS]; WORD_LENGTH],
}

impl LetterCounter {
    /// Creates a new letter counter based on the given word list.
    pub fn new(words: &[Word]) -> LetterCounter {
        let mut num_words_by_letter = [0; NUM_LETTERS];
        let mut num_words_by_located_letter = [[0; NUM_LETTERS]; WORD_LENGTH];
        for word in words {
            for (index, count) in num_words_by_letter.iter_mut().enumerate() {
                if word.letter_set().contains_index(index as u8) {
                    *count += 1;
                }
            }
            for (location, index) in word.indices().into_iter().enumerate() {
                num_words_by_located_letter[location][index as usize] += 1;
            }
        }
        LetterCounter {
            num_words: words.len(),
            num_words_by_letter,
            num_words_by_located_letter,
        }
    }

    /// The number of words that were counted.
    pub fn num_words(&self) -> usize {
        self.num_words
    }

    /// Retrieves the count of words that contain the given letter.
    pub fn num_words_with_letter(&self, letter: char) -> u32 {
        letter_index(letter).map_or(0, |index| self.num_words_by_letter[index as usize])
    }

    /// Retrieves the count of words with the given letter at the given location.
    pub fn num_words_with_located_letter(&self, letter: char, location: usize) -> u32 {
        match (letter_index(letter), self.num_words_by_located_letter.get(location)) {
            (Ok(index), Some(counts)) => counts[index as usize],
            _ => 0,
        }
    }

    /// Lists the letters that appear in the counted words but are not yet known to be in the
    /// secret, with the number of words containing each. The most common letters come first.
    pub fn unresolved_letters(&self, store: &ConstraintStore) -> Vec<(char, u32)> {
        let mut letters: Vec<(char, u32)> = (0..NUM_LETTERS as u8)
            .map(|index| (index_letter(index), self.num_words_by_letter[index as usize]))
            .filter(|(letter, count)| *count > 0 && !store.must_contain().contains(*letter))
            .collect();
        letters.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        letters
    }
}
