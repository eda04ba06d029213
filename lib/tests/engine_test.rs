#[macro_use]
extern crate assert_matches;

use wordle_minimax::*;

use std::result::Result;

fn words(words: &[&str]) -> Vec<Word> {
    words.iter().map(|word| Word::new(word).unwrap()).collect()
}

fn sample_bank() -> WordBank {
    WordBank::from_iterator(&["crane", "sunny", "sunup", "lunts", "bunny", "funny"]).unwrap()
}

#[test]
fn new_session_has_every_candidate() {
    let bank = sample_bank();

    let session = Session::new(&bank);

    assert_eq!(session.candidates(), &*bank);
    assert!(session.store().is_empty());
    assert!(session.guesses_made().is_empty());
}

#[test]
fn update_narrows_candidates() -> Result<(), WordleError> {
    let mut session = Session::new(&sample_bank());

    session.update(&Word::new("crane")?, &"XXXGX".parse()?)?;

    assert_eq!(session.candidates(), &words(&["sunny", "bunny", "funny"]));
    assert_eq!(session.store().known_pattern(), "---N-");
    assert_eq!(session.guesses_made(), &words(&["crane"]));
    Ok(())
}

#[test]
fn update_conflict_leaves_session_unchanged() -> Result<(), WordleError> {
    let mut session = Session::new(&sample_bank());
    session.update(&Word::new("crane")?, &"XXXGX".parse()?)?;
    let before = session.clone();

    let result = session.update(&Word::new("lunts")?, &"XXXGX".parse()?);

    assert_matches!(
        result,
        Err(WordleError::Conflict {
            position: 3,
            existing: 'N',
            proposed: 'T'
        })
    );
    assert_eq!(session.candidates(), before.candidates());
    assert_eq!(session.store(), before.store());
    assert_eq!(session.guesses_made(), before.guesses_made());
    Ok(())
}

#[test]
fn update_can_eliminate_everything() -> Result<(), WordleError> {
    let mut session = Session::new(&sample_bank());

    session.update(&Word::new("crane")?, &"GGGGA".parse()?)?;

    assert!(session.candidates().is_empty());
    assert_eq!(session.select_next_guess(GuessFrom::AllWords), None);
    assert!(session.rank(GuessFrom::PossibleWords, 5).is_empty());
    Ok(())
}

#[test]
fn from_store_resumes_session() -> Result<(), WordleError> {
    let bank = sample_bank();
    let mut session = Session::new(&bank);
    session.update(&Word::new("crane")?, &"XXXGX".parse()?)?;

    let resumed = Session::from_store(&bank, &bank, session.store().clone());

    assert_eq!(resumed.candidates(), session.candidates());
    assert_eq!(resumed.store(), session.store());
    Ok(())
}

#[test]
fn select_next_guess_splits_pair() -> Result<(), WordleError> {
    let answers = WordBank::from_iterator(&["sunny", "sunup"])?;
    let guesses = WordBank::from_iterator(&["lunts"])?;
    let session = Session::with_guesses(&answers, &guesses);

    assert_eq!(
        session.select_next_guess(GuessFrom::AllWords),
        Some(Word::new("sunny")?)
    );
    assert_eq!(
        session.select_next_guess(GuessFrom::PossibleWords),
        Some(Word::new("sunny")?)
    );
    Ok(())
}

#[test]
fn rank_returns_best_first() -> Result<(), WordleError> {
    let session = Session::new(&sample_bank());

    let ranked = session.rank(GuessFrom::AllWords, 2);

    assert_eq!(ranked.len(), 2);
    assert!(ranked[0].worst_case <= ranked[1].worst_case);
    assert_eq!(
        Some(ranked[0].guess),
        session.select_next_guess(GuessFrom::AllWords)
    );
    Ok(())
}

#[test]
fn play_game_solves_every_word() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(&["alpha", "allot", "begot", "below", "endow", "ingot"])?;

    for secret in bank.iter() {
        for guess_from in [GuessFrom::PossibleWords, GuessFrom::AllWords] {
            let result = play_game(secret, bank.len() as u32, Session::new(&bank), guess_from)?;

            assert_matches!(result, GameResult::Success(guesses) if guesses.last() == Some(secret));
        }
    }
    Ok(())
}

#[test]
fn play_game_runs_out_of_guesses() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(&["alpha", "allot", "begot", "below", "endow", "ingot"])?;

    let mut num_successes = 0;
    for secret in bank.iter() {
        match play_game(secret, 1, Session::new(&bank), GuessFrom::PossibleWords)? {
            GameResult::Success(guesses) => {
                assert_eq!(guesses, vec![*secret]);
                num_successes += 1;
            }
            GameResult::Failure(guesses) => assert_eq!(guesses.len(), 1),
            GameResult::UnknownWord => panic!("{} should be known", secret),
        }
    }
    assert_eq!(num_successes, 1);
    Ok(())
}

#[test]
fn play_game_unknown_word() -> Result<(), WordleError> {
    let bank = WordBank::from_iterator(&["alpha", "allot", "begot", "below", "endow", "ingot"])?;

    let result = play_game(
        &Word::new("other")?,
        6,
        Session::new(&bank),
        GuessFrom::AllWords,
    )?;

    assert_eq!(result, GameResult::UnknownWord);
    Ok(())
}
