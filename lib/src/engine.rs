use crate::data::*;
use crate::restrictions::extract;
use crate::restrictions::ConstraintStore;
use crate::results::*;
use crate::scorers::best_guess;
use crate::scorers::rank_guesses;
use crate::scorers::GuessScore;
use log::debug;
use log::warn;
use std::collections::HashSet;

/// Which words to choose guesses from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessFrom {
    /// Only guess words that could still be the secret.
    PossibleWords,
    /// Guess any allowed word, even if it can no longer be the secret. These often split the
    /// candidates better.
    AllWords,
}

/// One game's worth of state: the allowed guesses, the candidates that are still possible, and
/// everything learned so far.
#[derive(Clone, Debug)]
pub struct Session {
    all_guesses: Vec<Word>,
    possible_words: Vec<Word>,
    store: ConstraintStore,
    guesses_made: Vec<Word>,
}

impl Session {
    /// Starts a session where the bank supplies both the possible secrets and the allowed guesses.
    pub fn new(bank: &WordBank) -> Session {
        Session::from_store(bank, bank, ConstraintStore::new())
    }

    /// Starts a session with a separate list of allowed guesses. Possible secrets are always
    /// allowed as guesses too.
    pub fn with_guesses(answers: &WordBank, guesses: &WordBank) -> Session {
        Session::from_store(answers, guesses, ConstraintStore::new())
    }

    /// Resumes a session from previously saved constraints.
    pub fn from_store(answers: &WordBank, guesses: &WordBank, store: ConstraintStore) -> Session {
        let mut seen: HashSet<Word> = HashSet::with_capacity(guesses.len() + answers.len());
        let all_guesses: Vec<Word> = guesses
            .iter()
            .chain(answers.iter())
            .filter(|word| seen.insert(**word))
            .copied()
            .collect();
        let possible_words = filter_candidates(answers, &store);
        Session {
            all_guesses,
            possible_words,
            store,
            guesses_made: Vec::new(),
        }
    }

    /// Records the feedback for a guess and narrows the candidates.
    ///
    /// If the feedback conflicts with what is already known, an error is returned and the session
    /// is left unchanged.
    pub fn update(&mut self, guess: &Word, observed: &FeedbackPattern) -> Result<(), WordleError> {
        let delta = extract(guess, observed);
        self.store.merge(&delta)?;
        self.guesses_made.push(*guess);
        // Only the survivors of earlier guesses are rechecked.
        let num_before = self.possible_words.len();
        let store = &self.store;
        self.possible_words.retain(|word| store.satisfies(word));
        debug!(
            "{} {}: {} of {} candidates remain (known: {}, present: {}, absent: {})",
            guess,
            observed,
            self.possible_words.len(),
            num_before,
            self.store.known_pattern(),
            self.store.must_contain(),
            self.store.must_not_contain()
        );
        if self.possible_words.is_empty() {
            warn!("No candidates remain after {} {}", guess, observed);
        }
        Ok(())
    }

    /// The words that could still be the secret, in word-list order.
    pub fn candidates(&self) -> &[Word] {
        &self.possible_words
    }

    /// Every allowed guess.
    pub fn all_guesses(&self) -> &[Word] {
        &self.all_guesses
    }

    pub fn store(&self) -> &ConstraintStore {
        &self.store
    }

    pub fn guesses_made(&self) -> &[Word] {
        &self.guesses_made
    }

    fn guess_pool(&self, guess_from: GuessFrom) -> &[Word] {
        match guess_from {
            GuessFrom::PossibleWords => &self.possible_words,
            // Two or fewer candidates left: only guess candidates.
            GuessFrom::AllWords if self.possible_words.len() > 2 => &self.all_guesses,
            GuessFrom::AllWords => &self.possible_words,
        }
    }

    /// Returns up to `n` guesses, best first.
    pub fn rank(&self, guess_from: GuessFrom, n: usize) -> Vec<GuessScore> {
        let mut ranked = rank_guesses(self.guess_pool(guess_from), &self.possible_words);
        ranked.truncate(n);
        ranked
    }

    /// Returns the best next guess, or `None` if no candidates remain.
    pub fn select_next_guess(&self, guess_from: GuessFrom) -> Option<Word> {
        if self.possible_words.is_empty() {
            return None;
        }
        best_guess(self.guess_pool(guess_from), &self.possible_words).map(|score| score.guess)
    }
}

/// Plays a game against the given secret, always choosing the best minimax guess.
pub fn play_game(
    secret: &Word,
    max_num_guesses: u32,
    mut session: Session,
    guess_from: GuessFrom,
) -> Result<GameResult, WordleError> {
    if !session.candidates().contains(secret) {
        return Ok(GameResult::UnknownWord);
    }
    let mut guesses: Vec<Word> = Vec::new();
    for _ in 1..=max_num_guesses {
        let guess = match session.select_next_guess(guess_from) {
            Some(guess) => guess,
            None => return Ok(GameResult::UnknownWord),
        };
        guesses.push(guess);
        let observed = get_feedback(&guess, secret);
        if observed.is_solved() {
            return Ok(GameResult::Success(guesses));
        }
        session.update(&guess, &observed)?;
    }
    Ok(GameResult::Failure(guesses))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(words: &[&str]) -> WordBank {
        WordBank::from_iterator(words).unwrap()
    }

    #[test]
    fn with_guesses_includes_answers_once() {
        let answers = bank(&["sunny", "sunup"]);
        let guesses = bank(&["lunts", "sunny"]);

        let session = Session::with_guesses(&answers, &guesses);

        assert_eq!(session.all_guesses(), &*bank(&["lunts", "sunny", "sunup"]));
        assert_eq!(session.candidates(), &*answers);
    }

    #[test]
    fn guess_pool_uses_candidates_when_few_remain() {
        let answers = bank(&["sunny", "sunup"]);
        let guesses = bank(&["lunts"]);

        let session = Session::with_guesses(&answers, &guesses);

        assert_eq!(session.guess_pool(GuessFrom::AllWords), &*answers);
    }
}
