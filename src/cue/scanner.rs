use crate::cd::Msf;
use crate::cue::error::{CueError, CueResult, Location};
use crate::cue::models::{FileMode, TrackMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Catalog,
    File,
    Track,
    Index,
    Pregap,
    Rem,
}

const KEYWORDS: [(&str, Keyword); 6] = [
    ("CATALOG", Keyword::Catalog),
    ("FILE", Keyword::File),
    ("TRACK", Keyword::Track),
    ("INDEX", Keyword::Index),
    ("PREGAP", Keyword::Pregap),
    ("REM", Keyword::Rem),
];

impl Keyword {
    fn from_token(token: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, keyword)| *keyword)
    }
}

/// A directive the address accumulator cares about. Times are sector counts
/// relative to the start of the current FILE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Directive<'a> {
    File { name: &'a str, mode: FileMode },
    Track { number: u8, mode: TrackMode },
    Index { number: u8, time: u32 },
    Pregap { length: u32 },
    Ignored,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    /// Location of the first non blank character.
    pub fn start(&self) -> Location {
        let indent = self.text.len() - self.text.trim_start().len();
        self.at(indent)
    }

    fn at(&self, offset: usize) -> Location {
        Location {
            line: self.number,
            column: offset + 1,
        }
    }

    pub fn directive(&self) -> CueResult<Directive<'a>> {
        let mut tokens = Tokens::new(self.text);
        let Some((_, keyword)) = tokens.next_token() else {
            return Ok(Directive::Ignored);
        };

        match Keyword::from_token(keyword) {
            Some(Keyword::File) => self.file(&mut tokens),
            Some(Keyword::Track) => self.track(&mut tokens),
            Some(Keyword::Index) => self.index(&mut tokens),
            Some(Keyword::Pregap) => self.pregap(&mut tokens),
            Some(Keyword::Catalog) | Some(Keyword::Rem) | None => Ok(Directive::Ignored),
        }
    }

    fn file(&self, tokens: &mut Tokens<'a>) -> CueResult<Directive<'a>> {
        let (offset, name) = tokens.file_name().ok_or(CueError::MissingArgument {
            at: self.at(tokens.offset()),
            directive: "FILE",
            argument: "file name",
        })?;

        let name = match name {
            FileName::Quoted(Some(name)) => name,
            FileName::Quoted(None) => return Err(CueError::MissingQuote { at: self.at(offset) }),
            FileName::Bare(name) => name,
        };
        let name = name
            .strip_prefix("./")
            .or_else(|| name.strip_prefix(".\\"))
            .unwrap_or(name);
        if name.is_empty() {
            return Err(CueError::InvalidQuotedString { at: self.at(offset) });
        }

        let (offset, token) = tokens.next_token().ok_or(CueError::MissingArgument {
            at: self.at(tokens.offset()),
            directive: "FILE",
            argument: "file type",
        })?;
        let mode = FileMode::from_token(token).ok_or_else(|| CueError::InvalidFileType {
            at: self.at(offset),
            token: token.to_string(),
        })?;

        Ok(Directive::File { name, mode })
    }

    fn track(&self, tokens: &mut Tokens<'a>) -> CueResult<Directive<'a>> {
        let number = self.number_argument(tokens, "TRACK", "track number", 1)?;

        let (offset, token) = tokens.next_token().ok_or(CueError::MissingArgument {
            at: self.at(tokens.offset()),
            directive: "TRACK",
            argument: "track type",
        })?;
        let mode = TrackMode::from_token(token).ok_or_else(|| CueError::InvalidTrackType {
            at: self.at(offset),
            token: token.to_string(),
        })?;

        Ok(Directive::Track { number, mode })
    }

    fn index(&self, tokens: &mut Tokens<'a>) -> CueResult<Directive<'a>> {
        let number = self.number_argument(tokens, "INDEX", "index number", 0)?;
        let time = self.time_argument(tokens, "INDEX")?;

        Ok(Directive::Index { number, time })
    }

    fn pregap(&self, tokens: &mut Tokens<'a>) -> CueResult<Directive<'a>> {
        let length = self.time_argument(tokens, "PREGAP")?;

        Ok(Directive::Pregap { length })
    }

    fn number_argument(
        &self,
        tokens: &mut Tokens<'a>,
        directive: &'static str,
        argument: &'static str,
        min: u8,
    ) -> CueResult<u8> {
        let (offset, token) = tokens.next_token().ok_or(CueError::MissingArgument {
            at: self.at(tokens.offset()),
            directive,
            argument,
        })?;

        token
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| token.parse::<u8>().ok())
            .flatten()
            .filter(|number| (min..=99).contains(number))
            .ok_or_else(|| CueError::InvalidNumber {
                at: self.at(offset),
                token: token.to_string(),
            })
    }

    fn time_argument(&self, tokens: &mut Tokens<'a>, directive: &'static str) -> CueResult<u32> {
        let (offset, token) = tokens.next_token().ok_or(CueError::MissingArgument {
            at: self.at(tokens.offset()),
            directive,
            argument: "time",
        })?;

        token
            .parse::<Msf>()
            .map(|msf| msf.to_sectors())
            .map_err(|source| CueError::InvalidMsfFormat {
                at: self.at(offset),
                token: token.to_string(),
                source,
            })
    }
}

enum FileName<'a> {
    /// `None` when the closing quote is missing.
    Quoted(Option<&'a str>),
    Bare(&'a str),
}

/// Whitespace separated tokens of one line, with byte offsets.
struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn offset(&self) -> usize {
        self.pos
    }

    fn skip_space(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn next_token(&mut self) -> Option<(usize, &'a str)> {
        self.skip_space();
        let start = self.pos;
        let rest = &self.text[start..];
        if rest.is_empty() {
            return None;
        }

        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += len;

        Some((start, &rest[..len]))
    }

    /// A quoted name runs to the last quote on the line, so names may
    /// contain quotes themselves.
    fn file_name(&mut self) -> Option<(usize, FileName<'a>)> {
        self.skip_space();
        let start = self.pos;
        let rest = &self.text[start..];

        let Some(quoted) = rest.strip_prefix('"') else {
            return self
                .next_token()
                .map(|(offset, name)| (offset, FileName::Bare(name)));
        };

        match quoted.rfind('"') {
            Some(end) => {
                self.pos += end + 2;
                Some((start, FileName::Quoted(Some(&quoted[..end]))))
            }
            None => {
                self.pos = self.text.len();
                Some((start, FileName::Quoted(None)))
            }
        }
    }
}

/// Line cursor over the whole cue text.
#[derive(Debug, Clone)]
pub(crate) struct LineScanner<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> LineScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 0,
        }
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
        self.line = 0;
    }

    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if self.pos > self.text.len() {
            return None;
        }

        let rest = &self.text[self.pos..];
        let (raw, advance) = match rest.find('\n') {
            Some(end) => (&rest[..end], end + 1),
            // The last line has no terminator; step past the end afterwards.
            None => (rest, rest.len() + 1),
        };
        self.pos += advance;
        self.line += 1;

        Some(Line {
            number: self.line,
            text: raw.strip_suffix('\r').unwrap_or(raw),
        })
    }
}
