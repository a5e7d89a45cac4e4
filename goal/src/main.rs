use anyhow::Result;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use util::repl;

use goal::{
    abbreviate, dom, fund, less_than, parse_term, prelude::*, term::STACK_SIZE, term_to_string,
    EvalError, Options, ParseError,
};

fn build_report(e: &ParseError) -> Report<Span> {
    let span = e.span();
    let report = Report::build(ReportKind::Error, (), span.start).with_message(e.to_string());
    match e {
        ParseError::Empty => report.with_label(
            Label::new(span)
                .with_message("Expected a term here")
                .with_color(Color::Red),
        ),
        ParseError::Unexpected {
            found, expected, ..
        } => {
            let found = found.map_or_else(|| "end of the input".to_owned(), |c| c.to_string());
            let expected = expected
                .iter()
                .map(|c| c.map_or_else(|| "end of the input".to_owned(), |c| c.to_string()))
                .collect::<Vec<_>>()
                .join(", ");
            report
                .with_label(
                    Label::new(span)
                        .with_message(format!("Unexpected {}", found.fg(Color::Red)))
                        .with_color(Color::Red),
                )
                .with_note(format!("Expected one of {}", expected.fg(Color::Yellow)))
        }
        ParseError::Invalid { message, .. } => report.with_label(
            Label::new(span)
                .with_message(format!("{}", message.fg(Color::Red)))
                .with_color(Color::Red),
        ),
    }
    .finish()
}

enum Failure<'a> {
    Parse(&'a str, ParseError),
    Eval(EvalError),
    Usage(String),
}

type CommandResult<'a> = Result<(), Failure<'a>>;

fn parse(input: &str) -> Result<Term, Failure> {
    parse_term(input).map_err(|e| Failure::Parse(input, e))
}

#[derive(Default)]
struct Repl {
    options: Options,
}
impl Repl {
    fn show(&self, term: &Term) {
        let text = abbreviate(&term_to_string(term, &self.options), &self.options);
        if self.options.tex {
            println!("${text}$");
        } else {
            println!("{text}");
        }
    }

    /// `A[B]`, or `A` alone when `require_index` is unset.
    fn fund<'i>(&self, input: &'i str, require_index: bool) -> CommandResult<'i> {
        let Some((s, rest)) = input.split_once('[') else {
            if require_index {
                return Err(Failure::Usage("B is required: A[B]".to_owned()));
            }
            let s = parse(input)?;
            self.show(&s);
            return Ok(());
        };
        let Some(t) = rest.trim_end().strip_suffix(']') else {
            return Err(Failure::Usage("missing `]` after B".to_owned()));
        };
        if t.trim().is_empty() {
            return Err(Failure::Usage("B is required: A[B]".to_owned()));
        }
        let (s, t) = (parse(s)?, parse(t)?);
        tracing::debug!(%s, %t, "fund");
        let result = fund(&s, &t).map_err(Failure::Eval)?;
        self.show(&result);
        Ok(())
    }

    fn dom<'i>(&self, input: &'i str) -> CommandResult<'i> {
        let s = parse(input)?;
        tracing::debug!(%s, "dom");
        let d = dom(&s).map_or(Term::Zero, Term::from);
        self.show(&d);
        Ok(())
    }

    fn less_than(input: &str) -> CommandResult {
        let Some((s, t)) = input.split_once('<') else {
            return Err(Failure::Usage("B is required: A < B".to_owned()));
        };
        if t.trim().is_empty() {
            return Err(Failure::Usage("B is required: A < B".to_owned()));
        }
        let (s, t) = (parse(s)?, parse(t)?);
        tracing::debug!(%s, %t, "less_than");
        println!("{}", less_than(&s, &t));
        Ok(())
    }

    fn parse(input: &str) -> CommandResult {
        let term = parse(input)?;
        println!("{term:?}");
        Ok(())
    }

    fn set<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let mut words = input.split_whitespace();
        let Some(name) = words.next() else {
            return Err(Failure::Usage(format!(
                "usage: :set FLAG [on|off], where FLAG is one of {}",
                Options::FLAGS.join(", ")
            )));
        };
        let value = words.next();
        let Some(flag) = self.options.flag_mut(name) else {
            return Err(Failure::Usage(format!(
                "unknown flag `{name}`, expected one of {}",
                Options::FLAGS.join(", ")
            )));
        };
        *flag = match value {
            None => !*flag,
            Some("on" | "true" | "1") => true,
            Some("off" | "false" | "0") => false,
            Some(other) => {
                return Err(Failure::Usage(format!(
                    "expected `on` or `off`, got `{other}`"
                )))
            }
        };
        tracing::debug!(name, value = *flag, "option changed");
        println!("{name} is {}", if *flag { "on" } else { "off" });
        Ok(())
    }

    fn show_help() {
        println!(
            "{}",
            r#"
A[B]                -- same as :fund A[B]
A                   -- show A in the current notation
:fund       A[B]    -- show the B-th term of the fundamental sequence of A
:dom        A       -- show the cofinality domain of A
:lt         A < B   -- compare two terms
:parse      A       -- show the parsed structure of A
:set        FLAG    -- toggle a display option, or :set FLAG on|off
:options            -- show the display options
:help               -- show this message
        "#
            .trim()
        );
    }

    fn handle_repl_input<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let (cmd, input) = if let Some(stripped) = input.strip_prefix(':') {
            stripped
                .trim_start()
                .split_once(' ')
                .unwrap_or((stripped, ""))
        } else {
            ("", input)
        };
        match cmd {
            "" => self.fund(input, false)?,
            "f" | "fund" => self.fund(input, true)?,
            "d" | "dom" => self.dom(input)?,
            "l" | "lt" => Self::less_than(input)?,
            "p" | "parse" => Self::parse(input)?,
            "s" | "set" => self.set(input)?,
            "o" | "options" => println!("{}", self.options),
            "h" | "he" | "hel" | "help" => Self::show_help(),
            _ => {
                eprintln!("Unknown command {cmd}");
                Self::show_help();
            }
        }
        Ok(())
    }
}
impl repl::Repl for Repl {
    type Error = anyhow::Error;
    const HISTORY: Option<&'static str> = Some("/tmp/goal.history");
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error> {
        match self.handle_repl_input(input.trim()) {
            Ok(()) => {}
            // The padding gives errors at the end of the input a column to point at.
            Err(Failure::Parse(input, e)) => {
                build_report(&e).eprint(Source::from(format!("{input} ")))?
            }
            Err(Failure::Eval(e)) => eprintln!("Error: {e}"),
            Err(Failure::Usage(message)) => eprintln!("Error: {message}"),
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    println!("Hi, this is a calculator for the extended Goal function. :h to show help");
    println!();
    let shell = std::thread::Builder::new()
        .name("repl".to_owned())
        .stack_size(STACK_SIZE)
        .spawn(|| repl::start_repl(Repl::default()))?;
    shell
        .join()
        .map_err(|_| anyhow::anyhow!("the REPL thread panicked"))??;
    Ok(())
}
