//! Minimax scoring of guesses.
//!
//! A guess partitions the remaining candidates into buckets, one per feedback pattern it could
//! receive. The size of the largest bucket is the number of candidates that could still be left
//! after the guess in the worst case; the best guesses minimize it.

use crate::data::filter_candidates;
use crate::data::Word;
use crate::restrictions::ConstraintStore;
use crate::results::get_feedback;
use crate::results::FeedbackPattern;
use crate::results::NUM_PATTERNS;
use crate::results::WORD_LENGTH;
use log::debug;
use log::trace;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::iter::zip;

/// A guess with its letters laid out for fast, repeated feedback computation.
///
/// When the guess has no repeated letters, whether a non-hit letter is present only depends on
/// whether the secret contains that letter at all, which is a single bitmask test against the
/// secret's cached letter set. Guesses with repeated letters use [`get_feedback`].
#[derive(Clone, Copy, Debug)]
pub struct PreparedGuess {
    word: Word,
    letters: [u8; WORD_LENGTH],
    has_repeated_letters: bool,
}

impl PreparedGuess {
    pub fn new(word: Word) -> PreparedGuess {
        PreparedGuess {
            word,
            letters: word.indices(),
            has_repeated_letters: word.has_repeated_letters(),
        }
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    /// The base-3 index of the feedback this guess would receive if `secret` were the answer.
    /// Always equal to `get_feedback(self.word(), secret).index()`.
    pub fn feedback_index(&self, secret: &Word) -> u8 {
        if self.has_repeated_letters {
            return get_feedback(&self.word, secret).index();
        }
        let secret_letters = secret.letter_set();
        let mut index = 0;
        let mut place = 1;
        for (guess_letter, secret_letter) in zip(self.letters, secret.indices()) {
            if guess_letter == secret_letter {
                index += 2 * place;
            } else if secret_letters.contains_index(guess_letter) {
                index += place;
            }
            place *= 3;
        }
        index
    }

    /// Counts how many candidates fall into each feedback pattern, indexed by pattern index.
    pub fn bucket_counts(&self, candidates: &[Word]) -> [u32; NUM_PATTERNS] {
        let mut counts = [0u32; NUM_PATTERNS];
        for candidate in candidates {
            counts[self.feedback_index(candidate) as usize] += 1;
        }
        counts
    }
}

/// How a single guess partitions a set of candidate words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreResult {
    guess: Word,
    buckets: BTreeMap<FeedbackPattern, usize>,
    worst_case: usize,
}

impl ScoreResult {
    pub fn guess(&self) -> &Word {
        &self.guess
    }

    /// The number of candidates for each feedback pattern. Only non-empty buckets are included.
    pub fn buckets(&self) -> &BTreeMap<FeedbackPattern, usize> {
        &self.buckets
    }

    /// The size of the largest bucket, or 0 if there were no candidates.
    pub fn worst_case(&self) -> usize {
        self.worst_case
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// The number of candidates that were partitioned.
    pub fn total(&self) -> usize {
        self.buckets.values().sum()
    }

    /// The average number of candidates left after this guess, if every candidate is equally
    /// likely to be the secret.
    pub fn expected_remaining(&self) -> f64 {
        expected_remaining(self.buckets.values().map(|count| *count as u64))
    }

    /// The median number of candidates left after this guess, over every candidate as the
    /// secret.
    pub fn median_remaining(&self) -> f64 {
        median_remaining(self.buckets.values().map(|count| *count as u64).collect())
    }

    /// Summarizes this result for ranking.
    pub fn summary(&self) -> GuessScore {
        GuessScore {
            guess: self.guess,
            worst_case: self.worst_case,
            num_buckets: self.num_buckets(),
            expected_remaining: self.expected_remaining(),
            median_remaining: self.median_remaining(),
        }
    }
}

/// The ranking summary of one guess.
#[derive(Clone, Debug, PartialEq)]
pub struct GuessScore {
    pub guess: Word,
    /// The size of the largest bucket.
    pub worst_case: usize,
    /// The number of non-empty buckets.
    pub num_buckets: usize,
    /// The mean bucket size seen by a uniformly chosen secret.
    pub expected_remaining: f64,
    /// The median bucket size seen by a uniformly chosen secret.
    pub median_remaining: f64,
}

impl GuessScore {
    fn from_counts(guess: Word, counts: &[u32; NUM_PATTERNS]) -> GuessScore {
        let non_empty = counts.iter().filter(|count| **count > 0);
        GuessScore {
            guess,
            worst_case: non_empty.clone().max().copied().unwrap_or(0) as usize,
            num_buckets: non_empty.clone().count(),
            expected_remaining: expected_remaining(non_empty.clone().map(|count| *count as u64)),
            median_remaining: median_remaining(non_empty.map(|count| *count as u64).collect()),
        }
    }
}

fn expected_remaining(counts: impl Iterator<Item = u64>) -> f64 {
    let (total, sum_of_squares) = counts.fold((0, 0), |(total, squares), count| {
        (total + count, squares + count * count)
    });
    if total == 0 {
        return 0.0;
    }
    sum_of_squares as f64 / total as f64
}

fn median_remaining(mut counts: Vec<u64>) -> f64 {
    counts.sort_unstable();
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    // Secrets in order of the size of the bucket they fall into.
    let remaining_for = |secret: u64| {
        let mut seen = 0;
        for count in &counts {
            seen += count;
            if secret < seen {
                return *count;
            }
        }
        0
    };
    if total % 2 == 1 {
        remaining_for(total / 2) as f64
    } else {
        (remaining_for(total / 2 - 1) + remaining_for(total / 2)) as f64 / 2.0
    }
}

/// Orders guesses from best to worst: smallest worst case first, then the most buckets, then
/// alphabetically.
pub fn compare_scores(a: &GuessScore, b: &GuessScore) -> Ordering {
    a.worst_case
        .cmp(&b.worst_case)
        .then_with(|| b.num_buckets.cmp(&a.num_buckets))
        .then_with(|| a.guess.cmp(&b.guess))
}

/// Partitions `candidates` by the feedback that `guess` would receive against each of them.
///
/// ```
/// use wordle_minimax::Word;
/// use wordle_minimax::scorers::score_guess;
///
/// let candidates = vec![Word::new("sunny").unwrap(), Word::new("sunup").unwrap()];
/// let result = score_guess(&Word::new("sunny").unwrap(), &candidates);
///
/// assert_eq!(result.worst_case(), 1);
/// assert_eq!(result.num_buckets(), 2);
/// ```
pub fn score_guess(guess: &Word, candidates: &[Word]) -> ScoreResult {
    let counts = PreparedGuess::new(*guess).bucket_counts(candidates);
    let buckets: BTreeMap<FeedbackPattern, usize> = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .filter_map(|(index, count)| {
            FeedbackPattern::from_index(index as u8).map(|pattern| (pattern, *count as usize))
        })
        .collect();
    let worst_case = buckets.values().max().copied().unwrap_or(0);
    ScoreResult {
        guess: *guess,
        buckets,
        worst_case,
    }
}

/// Scores every guess against the candidates and returns them from best to worst, per
/// [`compare_scores`].
///
/// Guesses are scored in parallel. The order of the result only depends on the scores.
pub fn rank_guesses(guesses: &[Word], candidates: &[Word]) -> Vec<GuessScore> {
    let mut scores: Vec<GuessScore> = guesses
        .par_iter()
        .map(|guess| {
            let counts = PreparedGuess::new(*guess).bucket_counts(candidates);
            let score = GuessScore::from_counts(*guess, &counts);
            trace!(
                "{}: worst case {}, {} buckets",
                guess,
                score.worst_case,
                score.num_buckets
            );
            score
        })
        .collect();
    scores.par_sort_unstable_by(compare_scores);
    if let Some(best) = scores.first() {
        debug!(
            "Ranked {} guesses against {} candidates. Best: {} (worst case {}, {} buckets)",
            scores.len(),
            candidates.len(),
            best.guess,
            best.worst_case,
            best.num_buckets
        );
    }
    scores
}

/// Returns the best guess per [`rank_guesses`], if there are any guesses.
pub fn best_guess(guesses: &[Word], candidates: &[Word]) -> Option<GuessScore> {
    guesses
        .par_iter()
        .map(|guess| {
            GuessScore::from_counts(*guess, &PreparedGuess::new(*guess).bucket_counts(candidates))
        })
        .min_by(compare_scores)
}

/// Ranks second guesses for every feedback pattern that `opener` could receive.
///
/// For each pattern, the answers are filtered as if the opener had received it, and the best `n`
/// guesses against those candidates are kept. Patterns that leave no candidates are left out.
///
/// ```
/// use wordle_minimax::scorers::second_guesses;
/// use wordle_minimax::{FeedbackPattern, Word};
///
/// let answers = vec![Word::new("sunny").unwrap(), Word::new("sunup").unwrap()];
/// let table = second_guesses(&Word::new("crane").unwrap(), &answers, &answers, 1);
///
/// assert_eq!(table.len(), 2);
/// let pattern: FeedbackPattern = "XXXGX".parse().unwrap();
/// assert_eq!(table[&pattern][0].guess, answers[0]);
/// ```
pub fn second_guesses(
    opener: &Word,
    answers: &[Word],
    guesses: &[Word],
    n: usize,
) -> BTreeMap<FeedbackPattern, Vec<GuessScore>> {
    let mut table = BTreeMap::new();
    for pattern in FeedbackPattern::all() {
        let mut store = ConstraintStore::new();
        if store.update(opener, &pattern).is_err() {
            continue;
        }
        let candidates = filter_candidates(answers, &store);
        if candidates.is_empty() {
            continue;
        }
        let mut ranked = rank_guesses(guesses, &candidates);
        ranked.truncate(n);
        table.insert(pattern, ranked);
    }
    debug!(
        "{} of {} patterns for {} leave candidates",
        table.len(),
        NUM_PATTERNS,
        opener
    );
    table
}
