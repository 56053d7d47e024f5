//! Decisions the import core cannot make on its own
//!
//! The core asks a [`Chooser`] which catalog type a header should get, which
//! menu action to run next, and for free-text answers (paths, table names):
//! - [`PromptChooser`]: interactive prompts on a reader/writer pair (stdin/stdout)
//! - [`FixedColumnType`]: answers every column question with one catalog code
//! - [`ScriptedChooser`]: replays queued answers, for tests and scripted runs

use std::collections::VecDeque;
use std::io::{self, BufRead, Stdin, Stdout, Write};

use crate::error::{Error, Result};
use crate::populator::MenuOption;
use crate::schema::ColumnTypeDescriptor;

/// Source of answers for classification and menu decisions.
///
/// Implementations return whatever they were given; callers validate the
/// answer and ask again when it is not a valid code. Returning
/// [`Error::InputClosed`] ends the questioning.
pub trait Chooser {
    fn choose_column_type(
        &mut self,
        header: &str,
        choices: &[ColumnTypeDescriptor],
    ) -> Result<String>;

    fn choose_menu_action(&mut self, options: &[MenuOption]) -> Result<String>;

    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Interactive chooser writing prompts and reading one line per answer
pub struct PromptChooser<R, W> {
    input: R,
    output: W,
}

impl PromptChooser<io::StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Chooser for PromptChooser<R, W> {
    fn choose_column_type(
        &mut self,
        header: &str,
        choices: &[ColumnTypeDescriptor],
    ) -> Result<String> {
        writeln!(self.output, "What kind of column is {}?", header)?;
        for choice in choices {
            writeln!(self.output, "{}", choice.question())?;
        }
        self.read_answer()
    }

    fn choose_menu_action(&mut self, options: &[MenuOption]) -> Result<String> {
        writeln!(self.output)?;
        for option in options {
            writeln!(self.output, "    {}. {}", option.code(), option.label)?;
        }
        self.read_answer()
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.read_answer()
    }
}

/// Answers every column-type question with the same code and forwards
/// everything else to the wrapped chooser
pub struct FixedColumnType<C = ScriptedChooser> {
    code: String,
    inner: C,
}

impl FixedColumnType<ScriptedChooser> {
    pub fn new(code: impl Into<String>) -> Self {
        Self::wrap(code, ScriptedChooser::default())
    }
}

impl<C: Chooser> FixedColumnType<C> {
    pub fn wrap(code: impl Into<String>, inner: C) -> Self {
        Self {
            code: code.into(),
            inner,
        }
    }
}

impl<C: Chooser> Chooser for FixedColumnType<C> {
    fn choose_column_type(
        &mut self,
        _header: &str,
        _choices: &[ColumnTypeDescriptor],
    ) -> Result<String> {
        Ok(self.code.clone())
    }

    fn choose_menu_action(&mut self, options: &[MenuOption]) -> Result<String> {
        self.inner.choose_menu_action(options)
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.inner.ask(question)
    }
}

/// Replays queued answers in order, whatever the question
#[derive(Debug, Default)]
pub struct ScriptedChooser {
    answers: VecDeque<String>,
    /// Headers and questions seen so far
    pub asked: Vec<String>,
}

impl ScriptedChooser {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, question: &str) -> Result<String> {
        self.asked.push(question.to_string());
        self.answers.pop_front().ok_or(Error::InputClosed)
    }
}

impl Chooser for ScriptedChooser {
    fn choose_column_type(
        &mut self,
        header: &str,
        _choices: &[ColumnTypeDescriptor],
    ) -> Result<String> {
        self.next(header)
    }

    fn choose_menu_action(&mut self, _options: &[MenuOption]) -> Result<String> {
        self.next("menu")
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.next(question)
    }
}
