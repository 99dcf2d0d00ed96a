use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, BufRead, Write};

/// Line-oriented prompt I/O.
pub(crate) struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Self {
            input,
            output,
            clear_screen,
        }
    }

    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    /// Print `prompt`, then read one line. End of input is `UnexpectedEof`.
    /// Bytes that are not UTF-8 are replaced, so the answer still reaches
    /// the caller's validation.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(String::from_utf8_lossy(&line).trim().to_string())
    }

    pub fn pause(&mut self) -> io::Result<()> {
        self.ask("\nPress Enter to continue...").map(|_| ())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if !self.clear_screen {
            return Ok(());
        }
        crossterm::execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_trims_and_echoes_prompt() {
        let mut console = Console::new("  us-east1 \r\nnext\n".as_bytes(), Vec::new(), false);
        assert_eq!(console.ask("Region: ").unwrap(), "us-east1");
        assert_eq!(console.ask("Again: ").unwrap(), "next");
        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out, "Region: Again: ");
    }

    #[test]
    fn invalid_utf8_is_read_lossily() {
        let mut console = Console::new(&b"us-central\xff1\nus-central1\n"[..], Vec::new(), false);
        assert_eq!(console.ask("Region: ").unwrap(), "us-central\u{fffd}1");
        assert_eq!(console.ask("Region: ").unwrap(), "us-central1");
    }

    #[test]
    fn end_of_input_is_reported() {
        let mut console = Console::new("".as_bytes(), Vec::new(), false);
        let err = console.ask("Project ID: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn clear_is_skipped_when_disabled() {
        let mut console = Console::new("".as_bytes(), Vec::new(), false);
        console.clear().unwrap();
        assert!(console.into_output().is_empty());

        let mut console = Console::new("".as_bytes(), Vec::new(), true);
        console.clear().unwrap();
        assert!(!console.into_output().is_empty());
    }
}
