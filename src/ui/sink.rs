use std::io::{self, Stdout, Write};

use crate::config::Capabilities;

/// Destination for rendered math markup.
pub trait OutputSink {
    fn emit(&mut self, markup: &str) -> io::Result<()>;

    /// Emit markup under a caption. Surfaces that render math ignore the caption.
    fn emit_labelled(&mut self, _label: &str, markup: &str) -> io::Result<()> {
        self.emit(markup)
    }
}

/// Notebook rendering through the evcxr rich-content protocol.
#[derive(Debug)]
pub struct RichMathSink<W: Write = Stdout> {
    out: W,
}

impl RichMathSink<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> RichMathSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for RichMathSink<W> {
    fn emit(&mut self, markup: &str) -> io::Result<()> {
        writeln!(self.out, "EVCXR_BEGIN_CONTENT text/latex")?;
        writeln!(self.out, "$$\n{markup}\n$$")?;
        writeln!(self.out, "EVCXR_END_CONTENT")?;
        self.out.flush()
    }
}

/// Plain-text fallback: markup is printed verbatim.
#[derive(Debug)]
pub struct TextSink<W: Write = Stdout> {
    out: W,
}

impl TextSink<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for TextSink<W> {
    fn emit(&mut self, markup: &str) -> io::Result<()> {
        writeln!(self.out, "{markup}")?;
        self.out.flush()
    }

    fn emit_labelled(&mut self, label: &str, markup: &str) -> io::Result<()> {
        writeln!(self.out, "{label}")?;
        self.emit(markup)
    }
}

/// The stdout sink matching the detected display capability.
pub fn default_sink(caps: Capabilities) -> Box<dyn OutputSink> {
    if caps.has_rich_display {
        Box::new(RichMathSink::stdout())
    } else {
        Box::new(TextSink::stdout())
    }
}
