use crate::engine::FaqEngine;
use crate::response::Response;
use std::io::{self, BufRead, Write};

pub const REPL_FALLBACK_MESSAGE: &str =
    "Sorry, I don't understand your question. Please try rephrasing or type 'help' for assistance.";

const EXIT_COMMANDS: &[&str] = &["quit", "exit", "bye", "goodbye"];
const HELP_COMMANDS: &[&str] = &["help", "?"];
const EXAMPLE_QUESTIONS: &[&str] = &[
    "What is your return policy?",
    "How can I track my order?",
    "Do you ship internationally?",
    "What payment methods do you accept?",
    "How do I reset my password?",
];

pub fn print_header<W: Write>(out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(70);
    writeln!(out, "{rule}")?;
    writeln!(out, "FAQ ASSISTANT")?;
    writeln!(out, "Customer Support Question Answering")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "\nCommands:")?;
    writeln!(out, "  - Type your question to get an answer")?;
    writeln!(out, "  - Type 'help' to see example questions")?;
    writeln!(out, "  - Type 'quit' or 'exit' to end the conversation")?;
    writeln!(out, "{rule}")
}

pub fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(70);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "EXAMPLE QUESTIONS:")?;
    writeln!(out, "{rule}")?;
    for (i, example) in EXAMPLE_QUESTIONS.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, example)?;
    }
    writeln!(out, "{rule}\n")
}

pub fn display_response<W: Write>(out: &mut W, response: &Response) -> io::Result<()> {
    let rule = "-".repeat(70);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "BOT: {}", response.answer)?;
    writeln!(out, "{rule}")?;

    let band = response.confidence_band();
    writeln!(
        out,
        "Confidence: {}% [{} {}]",
        response.confidence_percent,
        band.indicator(),
        band
    )?;
    if let Some(matched) = &response.matched_question {
        writeln!(out, "Matched FAQ: \"{}\"", matched)?;
    }
    writeln!(out, "{rule}\n")
}

/// Read questions line by line until an exit command or end of input.
pub fn run<R: BufRead, W: Write>(engine: &FaqEngine, input: R, out: &mut W) -> io::Result<()> {
    print_header(out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "YOU: ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line?;
        let question = line.trim();
        let command = question.to_lowercase();

        if EXIT_COMMANDS.contains(&command.as_str()) {
            writeln!(out, "\nThank you for using the FAQ assistant! Goodbye!\n")?;
            return Ok(());
        }
        if HELP_COMMANDS.contains(&command.as_str()) {
            print_help(out)?;
            continue;
        }
        if question.is_empty() {
            writeln!(out, "Please enter a question.\n")?;
            continue;
        }

        display_response(out, &engine.ask(question))?;
    }
}
