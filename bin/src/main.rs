use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use std::error::Error;
use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Instant;
use wordle_minimax::scorers::score_guess;
use wordle_minimax::scorers::second_guesses;
use wordle_minimax::scorers::GuessScore;
use wordle_minimax::*;

/// Suggests Wordle guesses that leave the fewest candidates in the worst case.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a file that contains a list of possible answers, with one word on each line.
    #[arg(short = 'f', long)]
    words_file: String,

    /// Path to a file of extra words that may be guessed, but are never the answer.
    #[arg(short, long)]
    guesses_file: Option<String>,

    /// Where the constraints learned so far are saved between commands.
    #[arg(short, long, default_value = "wordle_state.ron")]
    state: String,

    /// How many guesses to print when ranking.
    #[arg(short = 'n', long, default_value_t = 10)]
    top: usize,

    /// Which words to consider as guesses.
    #[arg(long, value_enum, default_value_t = GuessSource::All)]
    guess_from: GuessSource,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GuessSource {
    /// Only words that could still be the answer.
    Possible,
    /// Every word in the word lists.
    All,
}

impl From<GuessSource> for GuessFrom {
    fn from(source: GuessSource) -> Self {
        match source {
            GuessSource::Possible => GuessFrom::PossibleWords,
            GuessSource::All => GuessFrom::AllWords,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forget everything learned so far.
    Reset,
    /// Record the feedback for a guess, e.g. `record crane XXAGX`.
    Record { guess: String, pattern: String },
    /// List the words that could still be the answer.
    Candidates,
    /// List the best next guesses.
    Rank,
    /// Show how one guess would split the remaining candidates.
    Score { guess: String },
    /// Show which letters are still undecided among the candidates.
    Letters,
    /// List the guesses that cover the most of the given letters, or of the undecided letters.
    Coverage { letters: Option<String> },
    /// List the best second guesses for each feedback the given opener could receive.
    Second {
        opener: String,
        /// Only show this feedback pattern, e.g. `XXAGX`.
        pattern: Option<String>,
    },
    /// Run a single game with the given word.
    Single { word: String },
    /// Run an interactive game against the solver.
    Interactive,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let start_time = Instant::now();
    let args = Args::parse();

    let answers = read_bank(&args.words_file)?;
    let guesses = match &args.guesses_file {
        Some(path) => read_bank(path)?,
        None => answers.clone(),
    };
    info!(
        "Loaded {} possible answers and {} allowed guesses",
        answers.len(),
        guesses.len()
    );
    let guess_from = GuessFrom::from(args.guess_from);

    match args.command {
        Command::Reset => {
            save_store(&args.state, &ConstraintStore::new())?;
            println!("Cleared {}.", args.state);
        }
        Command::Record { guess, pattern } => {
            let session = load_session(&args.state, &answers, &guesses)?;
            record(&args.state, session, &guess, &pattern)?;
        }
        Command::Candidates => {
            let session = load_session(&args.state, &answers, &guesses)?;
            print_candidates(&session);
        }
        Command::Rank => {
            let session = load_session(&args.state, &answers, &guesses)?;
            print_ranking(&session, guess_from, args.top);
        }
        Command::Score { guess } => {
            let session = load_session(&args.state, &answers, &guesses)?;
            print_score(&session, &Word::new(&guess)?);
        }
        Command::Letters => {
            let session = load_session(&args.state, &answers, &guesses)?;
            print_letters(&session);
        }
        Command::Coverage { letters } => {
            let session = load_session(&args.state, &answers, &guesses)?;
            let letters = match letters {
                Some(letters) => letters.parse::<LetterSet>()?,
                None => undecided_letters(&session),
            };
            print_coverage(&session, letters, args.top);
        }
        Command::Second { opener, pattern } => {
            let session = Session::with_guesses(&answers, &guesses);
            let pattern = pattern
                .map(|pattern| pattern.parse::<FeedbackPattern>())
                .transpose()?;
            print_second_guesses(&session, &Word::new(&opener)?, pattern, args.top);
        }
        Command::Single { word } => {
            let session = Session::with_guesses(&answers, &guesses);
            play_single_game(&Word::new(&word)?, session, guess_from)?;
        }
        Command::Interactive => {
            let session = Session::with_guesses(&answers, &guesses);
            play_interactive_game(session, guess_from)?;
        }
    }

    debug!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn read_bank(path: &str) -> Result<WordBank, WordleError> {
    let mut words_reader = io::BufReader::new(File::open(path)?);
    WordBank::from_reader(&mut words_reader)
}

fn load_session(
    state_path: &str,
    answers: &WordBank,
    guesses: &WordBank,
) -> Result<Session, Box<dyn Error>> {
    let store = if Path::new(state_path).exists() {
        ron::from_str::<ConstraintStore>(&fs::read_to_string(state_path)?)?
    } else {
        debug!("No state at {}, starting fresh", state_path);
        ConstraintStore::new()
    };
    Ok(Session::from_store(answers, guesses, store))
}

fn save_store(state_path: &str, store: &ConstraintStore) -> Result<(), Box<dyn Error>> {
    let serialized = ron::ser::to_string_pretty(store, ron::ser::PrettyConfig::default())?;
    fs::write(state_path, serialized)?;
    Ok(())
}

fn record(
    state_path: &str,
    mut session: Session,
    guess: &str,
    pattern: &str,
) -> Result<(), Box<dyn Error>> {
    let guess = Word::new(guess)?;
    let observed: FeedbackPattern = pattern.parse()?;
    if let Err(error) = session.update(&guess, &observed) {
        eprintln!("Nothing was recorded.");
        return Err(error.into());
    }
    save_store(state_path, session.store())?;
    println!(
        "Recorded {} {}. {} candidates remain.",
        guess,
        observed,
        session.candidates().len()
    );
    Ok(())
}

fn print_candidates(session: &Session) {
    println!("{} candidates:", session.candidates().len());
    for word in session.candidates() {
        println!("\t{}", word);
    }
}

fn print_ranking(session: &Session, guess_from: GuessFrom, top: usize) {
    print_scores(&session.rank(guess_from, top));
}

fn print_scores(scores: &[GuessScore]) {
    println!("|Guess|Worst case|Buckets|Expected|Median|");
    println!("|-----|----------|-------|--------|------|");
    for score in scores {
        println!(
            "|{}|{}|{}|{:.2}|{:.1}|",
            score.guess,
            score.worst_case,
            score.num_buckets,
            score.expected_remaining,
            score.median_remaining
        );
    }
}

fn undecided_letters(session: &Session) -> LetterSet {
    let mut letters = LetterSet::new();
    let counter = LetterCounter::new(session.candidates());
    for (letter, _) in counter.unresolved_letters(session.store()) {
        // Letters come from words, so they are always valid.
        let _ = letters.insert(letter);
    }
    letters
}

fn print_coverage(session: &Session, letters: LetterSet, top: usize) {
    println!("Guesses covering the most of {}:", letters);
    for (word, count) in rank_by_letter_coverage(session.all_guesses(), letters)
        .into_iter()
        .take(top)
    {
        println!("\t{}: {}", word, count);
    }
}

fn print_second_guesses(
    session: &Session,
    opener: &Word,
    pattern: Option<FeedbackPattern>,
    top: usize,
) {
    let table = second_guesses(opener, session.candidates(), session.all_guesses(), top);
    match pattern {
        Some(pattern) => match table.get(&pattern) {
            Some(scores) => print_scores(scores),
            None => println!("No answer gives {} for {}.", pattern, opener),
        },
        None => {
            for (pattern, scores) in &table {
                println!("\n{} {}", opener, pattern);
                print_scores(scores);
            }
        }
    }
}

fn print_score(session: &Session, guess: &Word) {
    let result = score_guess(guess, session.candidates());
    println!(
        "{} splits {} candidates into {} buckets. Worst case: {}, expected: {:.2}, median: {:.1}",
        guess,
        result.total(),
        result.num_buckets(),
        result.worst_case(),
        result.expected_remaining(),
        result.median_remaining()
    );
    let mut buckets: Vec<(&FeedbackPattern, &usize)> = result.buckets().iter().collect();
    buckets.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (pattern, count) in buckets {
        println!("\t{}: {}", pattern, count);
    }
}

fn print_letters(session: &Session) {
    let counter = LetterCounter::new(session.candidates());
    println!("Known: {}", session.store().known_pattern());
    println!("Present: {}", session.store().must_contain());
    println!("Absent: {}", session.store().must_not_contain());
    println!("Undecided letters among {} candidates:", counter.num_words());
    for (letter, count) in counter.unresolved_letters(session.store()) {
        println!("\t{}: {}", letter, count);
    }
}

fn play_single_game(
    word: &Word,
    session: Session,
    guess_from: GuessFrom,
) -> Result<(), WordleError> {
    match play_game(word, 128, session, guess_from)? {
        GameResult::Success(guesses) => {
            println!("Solved it! It took me {} guesses.", guesses.len());
            for guess in guesses.iter() {
                println!("\t{}", guess);
            }
        }
        GameResult::Failure(guesses) => {
            println!(
                "I still couldn't solve it after {} guesses :(",
                guesses.len()
            );
            for guess in guesses.iter() {
                println!("\t{}", guess);
            }
        }
        GameResult::UnknownWord => {
            eprintln!("Error: given word not in the word list.");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn play_interactive_game(mut session: Session, guess_from: GuessFrom) -> io::Result<()> {
    println!("Choose a word from the word-list. Press enter once you've chosen.");

    {
        let mut buffer = String::new();
        io::stdin().read_line(&mut buffer)?;
    }

    println!(
        "I will now try to guess your word.\n\n\
         For each guess, enter the correctness of each letter as:\n\n\
           * 'x' or '.' = this letter is not in the word\n\
           * 'a' or 'y' = this letter is in the word, but not in this location\n\
           * 'g' = this letter is in the word and in the right location.\n\n\
         For example, if your word was \"spade\" and the guess was \"soapy\", you would enter \"g.gy.\"");

    for round in 1..7 {
        let guess = match session.select_next_guess(guess_from) {
            Some(guess) => guess,
            None => {
                println!("No words match that feedback. Was a result entered incorrectly?");
                return Ok(());
            }
        };
        println!(
            "I'm guessing: {} ({} candidates left). How did I do?",
            guess,
            session.candidates().len()
        );

        loop {
            let observed = match read_feedback()? {
                Ok(observed) => observed,
                Err(error) => {
                    println!("{}. Try again.", error);
                    continue;
                }
            };
            if observed.is_solved() {
                println!("I did it! It took me {} guesses.", round);
                return Ok(());
            }
            match session.update(&guess, &observed) {
                Ok(()) => break,
                Err(error) => println!("{}. Try again.", error),
            }
        }
    }

    println!("I couldn't guess it :(");

    Ok(())
}

fn read_feedback() -> io::Result<Result<FeedbackPattern, WordleError>> {
    let mut buffer = String::new();
    if io::stdin().read_line(&mut buffer)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed before the game ended",
        ));
    }
    Ok(buffer.trim().parse())
}
