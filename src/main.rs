use ansi_term::Style;
use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lexis::choice::ChoiceQuiz;
use lexis::content::{ContentProvider, Library, Unit, VocabularyItem};
use lexis::exam::{self, DEFAULT_EXAM_LENGTH};
use lexis::flashcards::Deck;
use lexis::recall::{Advanced, Phase, RecallSession, Submission, DEFAULT_ROUND_SIZE};
use lexis::screen::{navigate, Event, Mode, Screen};
use lexis::speech::{CommandSpeaker, Lang, Silent, Speaker};
use lexis::theme::Palette;

#[derive(Parser)]
#[command(name = "lexis", about = "English vocabulary practice in the terminal", version)]
struct Cli {
    /// Load vocabulary from a YAML file instead of the bundled set
    #[arg(long)]
    content: Option<PathBuf>,

    /// Words per round in the typed-recall quiz
    #[arg(long, default_value_t = DEFAULT_ROUND_SIZE)]
    round_size: usize,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// How to pronounce words
    #[arg(long, default_value = "silent")]
    speech: SpeechKind,

    /// Text-to-speech program used with `--speech command`
    #[arg(long, default_value = "espeak-ng")]
    speech_program: String,

    /// Seed for shuffling, for repeatable sessions
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Debug, ValueEnum)]
enum SpeechKind {
    Silent,
    Command,
}

struct App<'c> {
    library: &'c Library,
    palette: Palette,
    speaker: Box<dyn Speaker>,
    rng: StdRng,
    round_size: usize,
}

impl<'c> App<'c> {
    fn run(&mut self) -> io::Result<()> {
        let mut screen = Screen::Home;
        loop {
            let event = match &screen {
                Screen::Exit => break,
                Screen::Home => self.home()?,
                Screen::Parts => self.parts()?,
                Screen::Units { part } => self.units(*part)?,
                Screen::Modes { part, unit } => self.modes(*part, *unit)?,
                Screen::Practice { part, unit, mode } => self.practice(*part, *unit, *mode)?,
                Screen::Topic { part, unit, topic } => self.topic(*part, *unit, *topic)?,
                Screen::Exam { part } => self.exam(*part)?,
            };
            screen = navigate(&screen, event, self.library);
        }
        println!("Goodbye!");
        Ok(())
    }

    fn home(&self) -> io::Result<Event> {
        let entries = ["Start practising".to_string(), "Quit".to_string()];
        self.menu("lexis: English vocabulary practice", Style::new().bold(), &entries)
    }

    fn parts(&self) -> io::Result<Event> {
        let entries: Vec<String> = self.library.parts().iter().map(|p| p.label()).collect();
        self.menu("Choose a part", Style::new().bold(), &entries)
    }

    fn units(&self, part: usize) -> io::Result<Event> {
        let Some(part) = self.library.part(part) else {
            return Ok(Event::Back);
        };
        let mut entries: Vec<String> = part
            .units
            .iter()
            .map(|u| format!("Unit {}: {} ({} words)", u.number, u.title, u.vocabulary.len()))
            .collect();
        entries.push(format!("Exam: mixed questions from the whole part ({} words)", part.items().len()));
        self.menu(&part.label(), self.palette.accent(part.accent), &entries)
    }

    fn modes(&self, part: usize, unit: usize) -> io::Result<Event> {
        let (Some(p), Some(u)) = (self.library.part(part), self.library.unit(part, unit)) else {
            return Ok(Event::Back);
        };
        let entries: Vec<String> = Mode::ALL.iter().map(|m| m.label().to_string()).collect();
        let title = format!("Unit {}: {}", u.number, u.title);
        self.menu(&title, self.palette.accent(p.accent), &entries)
    }

    fn menu(&self, title: &str, style: Style, entries: &[String]) -> io::Result<Event> {
        println!("\n{}", style.paint(title));
        for (i, entry) in entries.iter().enumerate() {
            println!("{}. {}", i + 1, entry);
        }
        println!("{}", self.palette.dim().paint("(b: back, h: home, q: quit)"));

        loop {
            let Some(input) = get_user_input("> ")? else {
                return Ok(Event::Quit);
            };
            match parse_menu_input(&input) {
                Some(event) => return Ok(event),
                None => println!("Please enter a number from the list."),
            }
        }
    }

    fn practice(&mut self, part: usize, unit: usize, mode: Mode) -> io::Result<Event> {
        let library = self.library;
        let Some(unit) = library.unit(part, unit) else {
            return Ok(Event::Back);
        };
        let items: Vec<&VocabularyItem> = unit.vocabulary.iter().collect();
        println!("\n{}", Style::new().bold().paint(mode.label()));

        match mode {
            Mode::Flashcards => self.flashcards(&items),
            Mode::Choice(direction) => {
                let quiz = ChoiceQuiz::new(&items, direction, &mut self.rng);
                self.choice(quiz)
            }
            Mode::Recall => self.recall(&items),
            Mode::Grammar => self.grammar(unit),
        }
    }

    fn grammar(&self, unit: &Unit) -> io::Result<Event> {
        if unit.grammar.is_empty() {
            println!("No grammar notes for this unit.");
            return Ok(Event::Back);
        }
        let entries: Vec<String> = unit.grammar.iter().map(|t| t.title.clone()).collect();
        self.menu(&format!("Grammar: Unit {}", unit.number), Style::new().bold(), &entries)
    }

    fn topic(&self, part: usize, unit: usize, topic: usize) -> io::Result<Event> {
        let Some(topic) = self.library.unit(part, unit).and_then(|u| u.grammar.get(topic)) else {
            return Ok(Event::Back);
        };
        println!("\n{}", Style::new().bold().paint(topic.title.as_str()));
        println!("{}", topic.explanation);
        for example in &topic.examples {
            println!("  e.g. {}", self.palette.correct().paint(example.as_str()));
        }
        if get_user_input("Press Enter to go back...")?.is_none() {
            return Ok(Event::Quit);
        }
        Ok(Event::Back)
    }

    fn exam(&mut self, part: usize) -> io::Result<Event> {
        let library = self.library;
        let Some(part) = library.part(part) else {
            return Ok(Event::Back);
        };
        println!("\n{}", self.palette.accent(part.accent).paint(format!("Exam: {}", part.label())));

        let mut quiz = exam::for_part(part, DEFAULT_EXAM_LENGTH, &mut self.rng);
        let interrupted = self.ask_all(&mut quiz)?;
        if interrupted == Some(Event::Quit) {
            return Ok(Event::Quit);
        }
        let result = exam::report(&quiz);
        println!(
            "Score: {}/{} ({}%) {}",
            self.palette.progress().paint(result.correct.to_string()),
            result.total,
            result.percent,
            Style::new().bold().paint(result.band.label())
        );
        Ok(interrupted.unwrap_or(Event::Finished))
    }

    fn flashcards(&mut self, items: &[&VocabularyItem]) -> io::Result<Event> {
        let mut deck = Deck::shuffled(items.iter().copied(), &mut self.rng);
        println!("{}", self.palette.dim().paint("(Enter: flip, n: next, p: previous, b: back)"));

        while let Some(card) = deck.current() {
            println!(
                "{}",
                self.palette.progress().paint(format!("Card {}/{}", deck.position() + 1, deck.len()))
            );
            if let Some((text, lang)) = deck.announcement() {
                self.speaker.speak(text, lang);
            }
            if deck.is_flipped() {
                println!("  {}", self.palette.correct().paint(card.meaning.as_str()));
                for example in &card.examples {
                    println!("  e.g. {}", example);
                }
                if !card.family.is_empty() {
                    println!("  family: {}", card.family.join(", "));
                }
                if !card.synonyms.is_empty() {
                    println!("  synonyms: {}", card.synonyms.join(", "));
                }
            } else {
                println!("  {} {}", Style::new().bold().paint(card.word.as_str()), card.ipa);
            }

            let Some(input) = get_user_input("> ")? else {
                return Ok(Event::Quit);
            };
            match input.as_str() {
                "" | "f" => deck.flip(),
                "n" => deck.next(),
                "p" => deck.previous(),
                "b" => return Ok(Event::Back),
                "q" => return Ok(Event::Quit),
                _ => println!("Enter, n, p or b."),
            }
        }
        println!("Nothing to practise here.");
        Ok(Event::Finished)
    }

    fn choice(&mut self, mut quiz: ChoiceQuiz) -> io::Result<Event> {
        if let Some(interrupted) = self.ask_all(&mut quiz)? {
            return Ok(interrupted);
        }
        let (correct, answered) = quiz.score();
        println!(
            "You got {} of {} right!",
            self.palette.progress().paint(correct.to_string()),
            self.palette.progress().paint(answered.to_string())
        );
        Ok(Event::Finished)
    }

    /// Runs every question. Returns the event that cut the quiz short, if any.
    fn ask_all(&mut self, quiz: &mut ChoiceQuiz) -> io::Result<Option<Event>> {
        let total = quiz.len();
        println!("{}", self.palette.dim().paint("(answer with a letter, :b back)"));

        while let Some(question) = quiz.current().cloned() {
            println!(
                "{}",
                self.palette.progress().paint(format!("({}/{})", quiz.position() + 1, total))
            );
            println!("{}", question.prompt);
            for (i, option) in question.options.iter().enumerate() {
                println!("{}. {}", (b'a' + i as u8) as char, option);
            }

            let chosen = loop {
                let Some(input) = get_user_input("Your answer: ")? else {
                    return Ok(Some(Event::Quit));
                };
                if input == ":b" {
                    return Ok(Some(Event::Back));
                }
                match parse_option(&input, question.options.len()) {
                    Some(index) => break index,
                    None => println!("Pick a letter between a and {}.", (b'a' + question.options.len() as u8 - 1) as char),
                }
            };

            if let Some(result) = quiz.answer(chosen) {
                print_result(&self.palette, result.correct, question.options[result.answer_index]);
                self.speaker.speak(question.item.headword(), Lang::English);
            }
            quiz.next();
        }
        Ok(None)
    }

    fn recall(&mut self, items: &[&VocabularyItem]) -> io::Result<Event> {
        let mut session = match RecallSession::start_with_rng(items.iter().copied(), self.round_size, &mut self.rng) {
            Ok(session) => session,
            Err(err) => {
                println!("{}", self.palette.wrong().paint(err.to_string()));
                return Ok(Event::Back);
            }
        };
        println!(
            "{}",
            self.palette.dim().paint("Type the English word for each meaning. (:b back, :r restart)")
        );

        loop {
            let Some(item) = session.current() else {
                if session.round_count() == 0 {
                    println!("Nothing to practise here.");
                    return Ok(Event::Finished);
                }
                println!(
                    "\nWell done! {} of {} words right on the first try, {} missed.",
                    self.palette.progress().paint(session.first_try_correct().to_string()),
                    items.len(),
                    session.misses()
                );
                let Some(input) = get_user_input("r to go again, Enter to return: ")? else {
                    return Ok(Event::Quit);
                };
                if input == "r" {
                    session.restart_with_rng(&mut self.rng);
                    continue;
                }
                return Ok(Event::Finished);
            };

            let progress = session.progress();
            println!(
                "\n{} {}",
                self.palette.progress().paint(format!("Round {}/{}", progress.round + 1, progress.rounds)),
                self.palette
                    .dim()
                    .paint(format!("{} of {} left", progress.remaining, progress.round_len))
            );
            match item.tag() {
                Some(tag) => println!("{} ({})", Style::new().bold().paint(item.meaning.as_str()), tag),
                None => println!("{}", Style::new().bold().paint(item.meaning.as_str())),
            }

            let label = match session.phase() {
                Phase::ForcedRewrite => "Type it again: ",
                _ => "Your answer: ",
            };
            let Some(input) = get_user_input(label)? else {
                return Ok(Event::Quit);
            };
            match input.as_str() {
                ":b" => return Ok(Event::Back),
                ":r" => {
                    session.restart_with_rng(&mut self.rng);
                    continue;
                }
                _ => {}
            }

            let Ok(outcome) = session.submit(&input) else {
                continue;
            };
            match outcome {
                Submission::Correct => {
                    print_result(&self.palette, true, item.headword());
                    self.speaker.speak(item.headword(), Lang::English);
                    if get_user_input("Press Enter to continue...")?.is_none() {
                        return Ok(Event::Quit);
                    }
                    if let Ok(Advanced::NextRound) = session.advance() {
                        println!("{}", self.palette.correct().paint("Round complete!"));
                    }
                }
                Submission::Incorrect => {
                    print_result(&self.palette, false, &format!("{} {}", item.headword(), item.ipa));
                    self.speaker.speak(item.headword(), Lang::English);
                }
                Submission::Requeued => {
                    println!("Good. This word will come back later in the round.");
                }
                Submission::TryAgain => {
                    println!("{}", self.palette.wrong().paint("Not yet correct, try again."));
                }
            }
        }
    }
}

fn parse_menu_input(input: &str) -> Option<Event> {
    match input {
        "b" => Some(Event::Back),
        "h" => Some(Event::Home),
        "q" => Some(Event::Quit),
        _ => match input.parse::<usize>() {
            Ok(n) if n > 0 => Some(Event::Select(n - 1)),
            _ => None,
        },
    }
}

/// Accepts a letter (`a`, `B`) or a 1-based number.
fn parse_option(input: &str, count: usize) -> Option<usize> {
    let index = match input.parse::<usize>() {
        Ok(n) => n.checked_sub(1)?,
        Err(_) => {
            let mut chars = input.chars();
            let letter = chars.next()?.to_ascii_lowercase();
            if chars.next().is_some() || !letter.is_ascii_lowercase() {
                return None;
            }
            (letter as u8 - b'a') as usize
        }
    };
    (index < count).then_some(index)
}

/// `Ok(None)` on end of input.
fn get_user_input(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn print_result(palette: &Palette, is_correct: bool, correct_answer: &str) {
    if is_correct {
        println!("{}", palette.correct().paint("Correct!"));
    } else {
        println!(
            "{} The answer is {}",
            palette.wrong().paint("Not quite."),
            palette.correct().paint(correct_answer)
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    #[cfg(windows)]
    ansi_term::enable_ansi_support().ok();

    let cli = Cli::parse();
    if cli.round_size == 0 {
        bail!("--round-size must be at least 1");
    }

    let library = match &cli.content {
        Some(path) => Library::from_path(path)
            .with_context(|| format!("could not load content from {}", path.display()))?,
        None => Library::bundled().context("bundled content is invalid")?,
    };

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let speaker: Box<dyn Speaker> = match cli.speech {
        SpeechKind::Silent => Box::new(Silent),
        SpeechKind::Command => Box::new(CommandSpeaker::new(cli.speech_program.clone())),
    };

    let mut app = App {
        library: &library,
        palette: Palette::new(!cli.no_color),
        speaker,
        rng,
        round_size: cli.round_size,
    };
    app.run()?;
    Ok(())
}
