//! Console output for staging components.
//!
//! Components receive a [`Log`] implementation at construction instead of looking one up
//! through a global registry, so tests can capture output and the driver decides where it goes.

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// The logging interface injected into components.
pub trait Log {
    /// Reports a progress step attributed to a component, e.g.
    /// `-----> Keystore Injector adding PEM cert.pem`.
    fn step(&self, component: &str, message: &str);

    /// Reports an error with a short header and a longer body.
    fn error(&self, header: &str, body: &str);
}

impl<L: Log + ?Sized> Log for std::sync::Arc<L> {
    fn step(&self, component: &str, message: &str) {
        (**self).step(component, message);
    }

    fn error(&self, header: &str, body: &str) {
        (**self).error(header, body);
    }
}

/// Writes colorized staging output to stdout/stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleLog;

impl Log for ConsoleLog {
    fn step(&self, component: &str, message: &str) {
        write_step(component, message).ok();
    }

    fn error(&self, header: &str, body: &str) {
        write_error(header, body).ok();
    }
}

fn write_step(component: &str, message: &str) -> io::Result<()> {
    let mut stream = StandardStream::stdout(ColorChoice::Always);

    stream.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(stream, "----->")?;
    stream.reset()?;

    write!(stream, " ")?;

    stream.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
    write!(stream, "{component}")?;
    stream.reset()?;

    writeln!(stream, " {message}")?;
    stream.flush()
}

fn write_error(header: &str, body: &str) -> io::Result<()> {
    let mut stream = StandardStream::stderr(ColorChoice::Always);

    write_styled_message(
        &mut stream,
        &format!("\n[Error: {header}]"),
        ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true),
    )?;
    write_styled_message(&mut stream, body, ColorSpec::new().set_fg(Some(Color::Red)))?;
    stream.flush()
}

// Styles each line of text separately, so that when staging output is streamed to the user
// (and prefixes like `remote:` added) the line colour doesn't leak into the prefixes.
fn write_styled_message(
    stream: &mut StandardStream,
    message: &str,
    spec: &ColorSpec,
) -> io::Result<()> {
    for line in message.split('\n') {
        stream.set_color(spec)?;
        write!(stream, "{line}")?;
        stream.reset()?;
        writeln!(stream)?;
    }
    Ok(())
}
