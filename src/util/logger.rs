use anyhow::anyhow;
use std::{fmt::Display, io::Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub trait Logger {
    /// Display new header section
    fn header(&mut self, msg: impl Display) -> anyhow::Result<()>;
    /// Display an info message
    fn info(&mut self, msg: impl Display) -> anyhow::Result<()>;
    /// Display an error, returning it as `Err` so callers can bail with `?`
    fn error(&mut self, header: impl Display, msg: impl Display) -> anyhow::Result<()>;
    /// Display debug information
    fn debug(&mut self, msg: impl Display) -> anyhow::Result<()>;
}

/// Buildpack output written to a pair of color-capable streams.
///
/// `prefix` tags each line with its level (`[INFO]`, `[ERROR]`) and enables section headers,
/// which is what the CNB lifecycle log expects. The CLI turns it off.
pub struct GenericLogger<T: Write + WriteColor> {
    debug: bool,
    prefix: bool,
    stderr: T,
    stdout: T,
}

/// Logger over the process' standard streams.
pub type BuildLogger = GenericLogger<StandardStream>;

impl BuildLogger {
    pub fn new(debug: bool, prefix: bool) -> Self {
        Self::with_streams(
            debug,
            prefix,
            StandardStream::stdout(ColorChoice::Auto),
            StandardStream::stderr(ColorChoice::Auto),
        )
    }
}

impl<T: Write + WriteColor> GenericLogger<T> {
    pub fn with_streams(debug: bool, prefix: bool, stdout: T, stderr: T) -> Self {
        GenericLogger {
            debug,
            prefix,
            stderr,
            stdout,
        }
    }

    pub fn stdout(&self) -> &T {
        &self.stdout
    }

    pub fn stderr(&self) -> &T {
        &self.stderr
    }

    fn tag(&self, level: &'static str) -> Option<&'static str> {
        self.prefix.then_some(level)
    }
}

fn styled_line<W: Write + WriteColor>(
    stream: &mut W,
    spec: Option<&ColorSpec>,
    tag: Option<&str>,
    msg: impl Display,
) -> anyhow::Result<()> {
    if let Some(spec) = spec {
        stream.set_color(spec)?;
    }
    match tag {
        Some(tag) => writeln!(stream, "{} {}", tag, msg)?,
        None => writeln!(stream, "{}", msg)?,
    }
    stream.reset()?;
    stream.flush()?;
    Ok(())
}

fn color(fg: Color, bold: bool) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(fg)).set_bold(bold);
    spec
}

impl<T: Write + WriteColor> Logger for GenericLogger<T> {
    fn header(&mut self, msg: impl Display) -> anyhow::Result<()> {
        if !self.prefix {
            return Ok(());
        }
        styled_line(
            &mut self.stdout,
            Some(&color(Color::Magenta, true)),
            None,
            format!("\n[{}]", msg),
        )
    }

    fn info(&mut self, msg: impl Display) -> anyhow::Result<()> {
        let tag = self.tag("[INFO]");
        styled_line(&mut self.stdout, Some(&color(Color::Green, false)), tag, msg)
    }

    fn error(&mut self, header: impl Display, msg: impl Display) -> anyhow::Result<()> {
        let tag = self.tag("[ERROR]");
        styled_line(&mut self.stderr, Some(&color(Color::Red, true)), tag, &header)?;
        styled_line(&mut self.stderr, Some(&color(Color::Red, false)), None, msg)?;
        Err(anyhow!("{}", header))
    }

    fn debug(&mut self, msg: impl Display) -> anyhow::Result<()> {
        if !self.debug {
            return Ok(());
        }
        let tag = self.tag("[DEBUG]");
        styled_line(&mut self.stdout, None, tag, msg)
    }
}
