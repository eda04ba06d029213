use crate::data::LetterSet;
use crate::data::Word;
use crate::results::FeedbackPattern;
use crate::results::LetterResult;
use crate::results::WordleError;
use crate::results::WORD_LENGTH;
use std::iter::zip;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The new information learned from a single guess, ready to be merged into a
/// [`ConstraintStore`].
///
/// Normally produced by [`extract`], but it can also be built by hand, e.g. to record a clue that
/// was learned some other way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstraintDelta {
    known: [Option<char>; WORD_LENGTH],
    excluded_at_position: [LetterSet; WORD_LENGTH],
    must_contain: LetterSet,
    must_not_contain: LetterSet,
}

impl ConstraintDelta {
    /// Creates a delta that adds no information.
    pub fn new() -> ConstraintDelta {
        ConstraintDelta::default()
    }

    /// Returns the constraints implied by `observed` feedback for `guess`.
    pub fn from_feedback(guess: &Word, observed: &FeedbackPattern) -> ConstraintDelta {
        extract(guess, observed)
    }

    /// Requires `letter` at `position`. This also requires the letter somewhere in the word.
    pub fn set_known(&mut self, position: usize, letter: char) -> Result<(), WordleError> {
        let slot = self
            .known
            .get_mut(position)
            .ok_or(WordleError::InvalidPosition(position))?;
        self.must_contain.insert(letter)?;
        *slot = Some(letter.to_ascii_uppercase());
        Ok(())
    }

    /// Forbids `letter` at `position`.
    pub fn exclude_at(&mut self, position: usize, letter: char) -> Result<(), WordleError> {
        self.excluded_at_position
            .get_mut(position)
            .ok_or(WordleError::InvalidPosition(position))?
            .insert(letter)?;
        Ok(())
    }

    /// Requires `letter` somewhere in the word.
    pub fn require(&mut self, letter: char) -> Result<(), WordleError> {
        self.must_contain.insert(letter)?;
        Ok(())
    }

    /// Forbids `letter` anywhere in the word.
    pub fn forbid(&mut self, letter: char) -> Result<(), WordleError> {
        self.must_not_contain.insert(letter)?;
        Ok(())
    }

    pub fn known(&self) -> &[Option<char>; WORD_LENGTH] {
        &self.known
    }

    pub fn excluded_at_position(&self) -> &[LetterSet; WORD_LENGTH] {
        &self.excluded_at_position
    }

    pub fn must_contain(&self) -> LetterSet {
        self.must_contain
    }

    pub fn must_not_contain(&self) -> LetterSet {
        self.must_not_contain
    }
}

/// Converts one guess and its observed feedback into the constraints it implies.
///
/// A letter only becomes globally forbidden if none of its occurrences in this guess were a hit
/// or present. Otherwise a miss just forbids the letter at that location.
///
/// ```
/// use wordle_minimax::{extract, Word};
///
/// let guess = Word::new("speed").unwrap();
/// let delta = extract(&guess, &"XAGXX".parse().unwrap());
///
/// assert_eq!(delta.known()[2], Some('E'));
/// assert_eq!(delta.must_contain().to_string(), "EP");
/// assert_eq!(delta.must_not_contain().to_string(), "DS");
/// ```
pub fn extract(guess: &Word, observed: &FeedbackPattern) -> ConstraintDelta {
    let mut delta = ConstraintDelta::new();
    for (letter, result) in zip(guess.indices(), observed.iter()) {
        if *result != LetterResult::Miss {
            delta.must_contain.insert_index(letter);
        }
    }
    for (position, (letter, result)) in zip(guess.indices(), observed.iter()).enumerate() {
        match result {
            LetterResult::Hit => {
                delta.known[position] = guess.letter(position);
            }
            LetterResult::Present => {
                delta.excluded_at_position[position].insert_index(letter);
            }
            LetterResult::Miss => {
                delta.excluded_at_position[position].insert_index(letter);
                if !delta.must_contain.contains_index(letter) {
                    delta.must_not_contain.insert_index(letter);
                }
            }
        }
    }
    delta
}

/// The knowledge accumulated from every guess so far. A word is still a candidate iff it
/// [satisfies](ConstraintStore::satisfies) the store.
///
/// `must_contain` and `must_not_contain` never overlap: once a letter is known to be in the word,
/// it is only ever excluded from specific locations.
///
/// Deserialized stores are checked with [`ConstraintStore::from_parts`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawConstraintStore")
)]
pub struct ConstraintStore {
    known: [Option<char>; WORD_LENGTH],
    excluded_at_position: [LetterSet; WORD_LENGTH],
    must_contain: LetterSet,
    must_not_contain: LetterSet,
}

/// The serialized form of a [`ConstraintStore`], before it has been checked.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawConstraintStore {
    known: [Option<char>; WORD_LENGTH],
    excluded_at_position: [LetterSet; WORD_LENGTH],
    must_contain: LetterSet,
    must_not_contain: LetterSet,
}

#[cfg(feature = "serde")]
impl TryFrom<RawConstraintStore> for ConstraintStore {
    type Error = WordleError;

    fn try_from(raw: RawConstraintStore) -> Result<Self, Self::Error> {
        ConstraintStore::from_parts(
            raw.known,
            raw.excluded_at_position,
            raw.must_contain,
            raw.must_not_contain,
        )
    }
}

impl ConstraintStore {
    /// Creates an empty store, which every word satisfies.
    pub fn new() -> ConstraintStore {
        ConstraintStore::default()
    }

    /// Builds a store from previously saved parts.
    ///
    /// Known letters are converted to upper case and also count as present. Fails with
    /// [`WordleError::InvalidLetter`] if a known letter is not `A` to `Z`, and with
    /// [`WordleError::Contradiction`] if a letter is both present and absent.
    pub fn from_parts(
        known: [Option<char>; WORD_LENGTH],
        excluded_at_position: [LetterSet; WORD_LENGTH],
        must_contain: LetterSet,
        must_not_contain: LetterSet,
    ) -> Result<ConstraintStore, WordleError> {
        let mut store = ConstraintStore {
            known: [None; WORD_LENGTH],
            excluded_at_position,
            must_contain,
            must_not_contain,
        };
        for (slot, letter) in zip(&mut store.known, known) {
            if let Some(letter) = letter {
                store.must_contain.insert(letter)?;
                *slot = Some(letter.to_ascii_uppercase());
            }
        }
        if let Some(letter) = store.must_contain.intersection(must_not_contain).iter().next() {
            return Err(WordleError::Contradiction(letter));
        }
        Ok(store)
    }

    /// Merges the information from one guess's feedback into this store.
    pub fn update(&mut self, guess: &Word, observed: &FeedbackPattern) -> Result<(), WordleError> {
        self.merge(&extract(guess, observed))
    }

    /// Adds the given constraints to this store.
    ///
    /// Fails with [`WordleError::Conflict`] if the delta requires a different letter at a
    /// location that is already known. The store is unchanged when this fails.
    pub fn merge(&mut self, delta: &ConstraintDelta) -> Result<(), WordleError> {
        for (position, (existing, proposed)) in zip(&self.known, &delta.known).enumerate() {
            if let (Some(existing), Some(proposed)) = (existing, proposed) {
                if existing != proposed {
                    return Err(WordleError::Conflict {
                        position,
                        existing: *existing,
                        proposed: *proposed,
                    });
                }
            }
        }
        for (known, proposed) in zip(&mut self.known, &delta.known) {
            if known.is_none() {
                *known = *proposed;
            }
        }
        for (excluded, added) in zip(&mut self.excluded_at_position, &delta.excluded_at_position) {
            *excluded = excluded.union(*added);
        }
        self.must_contain = self.must_contain.union(delta.must_contain);
        self.must_not_contain = self
            .must_not_contain
            .union(delta.must_not_contain)
            .difference(self.must_contain);
        Ok(())
    }

    /// Returns a copy of this store with the delta merged in.
    pub fn merged(&self, delta: &ConstraintDelta) -> Result<ConstraintStore, WordleError> {
        let mut merged = self.clone();
        merged.merge(delta)?;
        Ok(merged)
    }

    /// Returns `true` iff the given word satisfies these constraints.
    pub fn satisfies(&self, word: &Word) -> bool {
        let letters = word.letter_set();
        letters.is_superset(self.must_contain)
            && letters.is_disjoint(self.must_not_contain)
            && zip(word.chars(), zip(&self.known, &self.excluded_at_position)).all(
                |(letter, (known, excluded))| {
                    known.map_or(true, |known| known == letter) && !excluded.contains(letter)
                },
            )
    }

    /// Returns `true` iff nothing is known yet.
    pub fn is_empty(&self) -> bool {
        *self == ConstraintStore::default()
    }

    pub fn known(&self) -> &[Option<char>; WORD_LENGTH] {
        &self.known
    }

    pub fn excluded_at_position(&self) -> &[LetterSet; WORD_LENGTH] {
        &self.excluded_at_position
    }

    pub fn must_contain(&self) -> LetterSet {
        self.must_contain
    }

    pub fn must_not_contain(&self) -> LetterSet {
        self.must_not_contain
    }

    /// The known letters, with `-` for each unknown location, e.g. `"--N-Y"`.
    pub fn known_pattern(&self) -> String {
        self.known
            .iter()
            .map(|known| known.unwrap_or('-'))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(word: &str) -> Word {
        Word::new(word).unwrap()
    }

    fn pattern(pattern: &str) -> FeedbackPattern {
        pattern.parse().unwrap()
    }

    #[test]
    fn extract_hits_and_present() {
        let delta = extract(&word("crane"), &pattern("GAXXX"));

        assert_eq!(delta.known(), &[Some('C'), None, None, None, None]);
        assert_eq!(delta.must_contain().to_string(), "CR");
        assert_eq!(delta.must_not_contain().to_string(), "AEN");
        assert_eq!(delta.excluded_at_position()[0].to_string(), "");
        assert_eq!(delta.excluded_at_position()[1].to_string(), "R");
        assert_eq!(delta.excluded_at_position()[2].to_string(), "A");
    }

    #[test]
    fn extract_repeated_letter_miss_and_hit_is_not_forbidden() {
        // Secret "CREPT": the second E in "SPEED" is a miss, but E is in the word.
        let delta = extract(&word("speed"), &pattern("XAGXX"));

        assert!(delta.must_contain().contains('E'));
        assert!(!delta.must_not_contain().contains('E'));
        assert!(delta.excluded_at_position()[3].contains('E'));
        assert_eq!(delta.must_not_contain().to_string(), "DS");
    }

    #[test]
    fn extract_repeated_letter_miss_before_present_is_not_forbidden() {
        let delta = extract(&word("eerie"), &pattern("XXXXA"));

        assert!(delta.must_contain().contains('E'));
        assert!(!delta.must_not_contain().contains('E'));
        assert!(delta.excluded_at_position()[0].contains('E'));
        assert!(delta.excluded_at_position()[1].contains('E'));
        assert!(delta.excluded_at_position()[4].contains('E'));
    }

    #[test]
    fn delta_builders() -> Result<(), WordleError> {
        let mut delta = ConstraintDelta::new();

        delta.set_known(2, 'a')?;
        delta.exclude_at(0, 'b')?;
        delta.require('c')?;
        delta.forbid('d')?;

        assert_eq!(delta.known()[2], Some('A'));
        assert_eq!(delta.must_contain().to_string(), "AC");
        assert_eq!(delta.excluded_at_position()[0].to_string(), "B");
        assert_eq!(delta.must_not_contain().to_string(), "D");
        assert_eq!(delta.set_known(5, 'a'), Err(WordleError::InvalidPosition(5)));
        assert_eq!(delta.exclude_at(0, '#'), Err(WordleError::InvalidLetter('#')));
        Ok(())
    }

    #[test]
    fn empty_store_is_satisfied_by_everything() {
        let store = ConstraintStore::new();

        assert!(store.is_empty());
        assert!(store.satisfies(&word("abcde")));
        assert!(store.satisfies(&word("zzzzz")));
        assert_eq!(store.known_pattern(), "-----");
    }

    #[test]
    fn satisfies_with_constraints() -> Result<(), WordleError> {
        let mut store = ConstraintStore::new();

        store.update(&word("speed"), &pattern("XAGXX"))?;

        assert!(store.satisfies(&word("crept")));
        assert!(store.satisfies(&word("crepe")));
        // P at its excluded location.
        assert!(!store.satisfies(&word("apeck")));
        // No E at location 2.
        assert!(!store.satisfies(&word("prawn")));
        // Contains S.
        assert!(!store.satisfies(&word("toeps")));
        // Second E at an excluded location.
        assert!(!store.satisfies(&word("cheep")));
        // Missing P.
        assert!(!store.satisfies(&word("cheat")));
        assert_eq!(store.known_pattern(), "--E--");
        Ok(())
    }

    #[test]
    fn merge_unions_information() -> Result<(), WordleError> {
        let mut store = ConstraintStore::new();

        // Secret "SUNNY".
        store.update(&word("crane"), &pattern("XXXGX"))?;
        store.update(&word("lunts"), &pattern("XGGXA"))?;

        assert_eq!(store.known_pattern(), "-UNN-");
        assert_eq!(store.must_contain().to_string(), "NSU");
        assert_eq!(store.must_not_contain().to_string(), "ACELRT");
        assert_eq!(store.excluded_at_position()[3].to_string(), "T");
        assert_eq!(store.excluded_at_position()[4].to_string(), "ES");
        assert!(store.satisfies(&word("sunny")));
        assert!(!store.satisfies(&word("sunup")));
        Ok(())
    }

    #[test]
    fn merge_present_letter_is_removed_from_must_not_contain() -> Result<(), WordleError> {
        let mut store = ConstraintStore::new();

        store.update(&word("eerie"), &pattern("XXXXX"))?;
        assert!(store.must_not_contain().contains('E'));

        store.update(&word("tepid"), &pattern("XAXXX"))?;

        assert!(store.must_contain().contains('E'));
        assert!(!store.must_not_contain().contains('E'));
        assert!(store.must_contain().is_disjoint(store.must_not_contain()));
        Ok(())
    }

    #[test]
    fn merge_never_moves_letter_into_must_not_contain() -> Result<(), WordleError> {
        let mut store = ConstraintStore::new();

        store.update(&word("tepid"), &pattern("XAXXX"))?;
        store.update(&word("eerie"), &pattern("XXXXX"))?;

        assert!(store.must_contain().contains('E'));
        assert!(!store.must_not_contain().contains('E'));
        Ok(())
    }

    #[test]
    fn merge_conflicting_known_letter() -> Result<(), WordleError> {
        let mut store = ConstraintStore::new();
        let mut first = ConstraintDelta::new();
        first.set_known(2, 'B')?;
        store.merge(&first)?;
        let before = store.clone();

        let mut second = ConstraintDelta::new();
        second.set_known(2, 'A')?;
        second.forbid('z')?;

        assert_eq!(
            store.merge(&second),
            Err(WordleError::Conflict {
                position: 2,
                existing: 'B',
                proposed: 'A'
            })
        );
        assert_eq!(store, before);
        Ok(())
    }

    #[test]
    fn merge_same_known_letter_is_fine() -> Result<(), WordleError> {
        let mut store = ConstraintStore::new();

        store.update(&word("crane"), &pattern("XXGXX"))?;
        store.update(&word("slate"), &pattern("XXGXX"))?;

        assert_eq!(store.known_pattern(), "--A--");
        Ok(())
    }

    #[test]
    fn merged_leaves_original_untouched() -> Result<(), WordleError> {
        let store = ConstraintStore::new();

        let merged = store.merged(&extract(&word("crane"), &pattern("GXXXX")))?;

        assert!(store.is_empty());
        assert_eq!(merged.known_pattern(), "C----");
        Ok(())
    }

    #[test]
    fn from_parts_round_trips_merged_store() -> Result<(), WordleError> {
        let mut store = ConstraintStore::new();
        store.update(&word("crane"), &pattern("XXXGX"))?;
        store.update(&word("lunts"), &pattern("XGGXA"))?;

        let rebuilt = ConstraintStore::from_parts(
            *store.known(),
            *store.excluded_at_position(),
            store.must_contain(),
            store.must_not_contain(),
        )?;

        assert_eq!(rebuilt, store);
        Ok(())
    }

    #[test]
    fn from_parts_normalizes_known_letters() -> Result<(), WordleError> {
        let store = ConstraintStore::from_parts(
            [Some('n'), None, None, None, None],
            Default::default(),
            LetterSet::new(),
            "E".parse()?,
        )?;

        assert_eq!(store.known_pattern(), "N----");
        assert_eq!(store.must_contain().to_string(), "N");
        assert!(store.satisfies(&word("nasty")));
        Ok(())
    }

    #[test]
    fn from_parts_rejects_non_letter() {
        assert_eq!(
            ConstraintStore::from_parts(
                [None, Some('3'), None, None, None],
                Default::default(),
                LetterSet::new(),
                LetterSet::new(),
            ),
            Err(WordleError::InvalidLetter('3'))
        );
    }

    #[test]
    fn from_parts_rejects_overlap() -> Result<(), WordleError> {
        assert_eq!(
            ConstraintStore::from_parts(
                Default::default(),
                Default::default(),
                "E".parse()?,
                "ES".parse()?,
            ),
            Err(WordleError::Contradiction('E'))
        );
        assert_eq!(
            ConstraintStore::from_parts(
                [Some('s'), None, None, None, None],
                Default::default(),
                LetterSet::new(),
                "S".parse()?,
            ),
            Err(WordleError::Contradiction('S'))
        );
        Ok(())
    }
}
