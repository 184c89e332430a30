//! Canonical HCL formatting.
//!
//! Each line is tokenized with `nom` just far enough to see strings,
//! comments, brackets and the first `=`. From that the formatter
//! recomputes indentation (two spaces per nesting level), aligns `=`
//! across consecutive attribute lines at the same level, collapses blank
//! runs, and drops blank lines directly inside braces. Formatting its own
//! output yields the same text.

use compose2nomad_common::error::{ConvertError, Result};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{anychar, char, multispace1, one_of},
    combinator::{recognize, rest, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::pair,
};

const INDENT: &str = "  ";

/// A lexical piece of one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Space,
    Str(&'a str),
    Comment(&'a str),
    Open(char),
    Close(char),
    Equals,
    Word(&'a str),
}

impl Piece<'_> {
    fn write_to(self, out: &mut String) {
        match self {
            Self::Space => out.push(' '),
            Self::Str(s) | Self::Comment(s) | Self::Word(s) => out.push_str(s),
            Self::Open(c) | Self::Close(c) => out.push(c),
            Self::Equals => out.push('='),
        }
    }
}

const fn is_special(c: char) -> bool {
    matches!(
        c,
        '"' | '#' | '/' | '{' | '}' | '[' | ']' | '(' | ')' | '=' | ' ' | '\t' | '\r'
    )
}

fn space(input: &str) -> IResult<&str, Piece<'_>> {
    value(Piece::Space, multispace1).parse(input)
}

fn comment(input: &str) -> IResult<&str, Piece<'_>> {
    recognize(pair(alt((tag("#"), tag("//"))), rest))
        .map(Piece::Comment)
        .parse(input)
}

/// Parses a quoted string, keeping the quotes and escapes verbatim.
fn string_literal(input: &str) -> IResult<&str, Piece<'_>> {
    let (body, _) = char::<_, Error<&str>>('"').parse(input)?;
    let mut escaped = false;
    for (idx, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => {
                let end = idx + 2;
                return Ok((&input[end..], Piece::Str(&input[..end])));
            }
            _ => {}
        }
    }
    Err(nom::Err::Failure(Error::new(input, ErrorKind::Char)))
}

fn open(input: &str) -> IResult<&str, Piece<'_>> {
    one_of("{[(").map(Piece::Open).parse(input)
}

fn close(input: &str) -> IResult<&str, Piece<'_>> {
    one_of("}])").map(Piece::Close).parse(input)
}

fn equals(input: &str) -> IResult<&str, Piece<'_>> {
    value(Piece::Equals, char('=')).parse(input)
}

fn word(input: &str) -> IResult<&str, Piece<'_>> {
    take_while1(|c: char| !is_special(c))
        .map(Piece::Word)
        .parse(input)
}

fn other(input: &str) -> IResult<&str, Piece<'_>> {
    recognize(anychar).map(Piece::Word).parse(input)
}

fn lex_line(line: &str) -> std::result::Result<Vec<Piece<'_>>, String> {
    let mut pieces = many0(alt((
        space,
        comment,
        string_literal,
        open,
        close,
        equals,
        word,
        other,
    )));
    match pieces.parse(line) {
        Ok(("", pieces)) => Ok(pieces),
        Ok((remaining, _)) => Err(format!("unexpected input `{remaining}`")),
        Err(nom::Err::Failure(_)) => Err("unterminated string literal".into()),
        Err(e) => Err(e.to_string()),
    }
}

fn render(pieces: &[Piece<'_>]) -> String {
    let mut out = String::new();
    for piece in pieces {
        piece.write_to(&mut out);
    }
    out.trim().to_owned()
}

/// One classified output line.
#[derive(Debug)]
enum Line {
    Blank,
    Text {
        indent: usize,
        text: String,
        opens: bool,
        closes_first: bool,
    },
    Attribute {
        indent: usize,
        key: String,
        value: String,
        opens: bool,
    },
}

impl Line {
    const fn opens(&self) -> bool {
        match self {
            Self::Blank => false,
            Self::Text { opens, .. } | Self::Attribute { opens, .. } => *opens,
        }
    }

    const fn closes_first(&self) -> bool {
        matches!(self, Self::Text { closes_first: true, .. })
    }
}

fn classify(pieces: &[Piece<'_>], depth: &mut usize, line_no: usize) -> Result<Line> {
    let significant: Vec<(usize, Piece<'_>)> = pieces
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| *p != Piece::Space)
        .collect();

    if significant.is_empty() {
        return Ok(Line::Blank);
    }

    let leading_closers = significant
        .iter()
        .take_while(|(_, p)| matches!(p, Piece::Close(_)))
        .count();
    let indent = depth.checked_sub(leading_closers).ok_or_else(|| unbalanced(line_no))?;

    let opens = pieces.iter().filter(|p| matches!(p, Piece::Open(_))).count();
    let closes = pieces.iter().filter(|p| matches!(p, Piece::Close(_))).count();
    *depth = (*depth + opens)
        .checked_sub(closes)
        .ok_or_else(|| unbalanced(line_no))?;
    let opens_scope = *depth > indent;

    let is_attribute = matches!(
        significant.as_slice(),
        [(_, Piece::Word(_) | Piece::Str(_)), (_, Piece::Equals), ..]
    );
    if is_attribute {
        let eq = significant[1].0;
        return Ok(Line::Attribute {
            indent,
            key: render(&pieces[..eq]),
            value: render(&pieces[eq + 1..]),
            opens: opens_scope,
        });
    }

    Ok(Line::Text {
        indent,
        text: render(pieces),
        opens: opens_scope,
        closes_first: leading_closers > 0,
    })
}

fn unbalanced(line_no: usize) -> ConvertError {
    ConvertError::Serialization {
        message: format!("unbalanced closing bracket on line {line_no}"),
    }
}

/// Drops leading, trailing, repeated, and brace-adjacent blank lines.
fn prune_blanks(lines: Vec<Line>) -> Vec<Line> {
    let mut kept: Vec<Line> = Vec::with_capacity(lines.len());
    let mut pending_blank = false;
    for line in lines {
        if matches!(line, Line::Blank) {
            pending_blank = true;
            continue;
        }
        let after_open = kept.last().is_none_or(Line::opens);
        if pending_blank && !after_open && !line.closes_first() {
            kept.push(Line::Blank);
        }
        pending_blank = false;
        kept.push(line);
    }
    kept
}

/// Computes the key width of each attribute run (consecutive attribute
/// lines at the same indentation).
fn alignment_widths(lines: &[Line]) -> Vec<usize> {
    let mut widths = vec![0; lines.len()];
    let mut start = 0;
    while start < lines.len() {
        let Line::Attribute { indent, .. } = &lines[start] else {
            start += 1;
            continue;
        };
        let mut end = start;
        while let Some(Line::Attribute { indent: next, .. }) = lines.get(end) {
            if next != indent {
                break;
            }
            end += 1;
        }
        let width = lines[start..end]
            .iter()
            .map(|l| match l {
                Line::Attribute { key, .. } => key.chars().count(),
                Line::Blank | Line::Text { .. } => 0,
            })
            .max()
            .unwrap_or(0);
        for w in &mut widths[start..end] {
            *w = width;
        }
        start = end;
    }
    widths
}

/// Formats HCL source text canonically.
///
/// # Errors
///
/// Returns [`ConvertError::Serialization`] if the text contains an
/// unterminated string or unbalanced brackets.
pub fn format(src: &str) -> Result<String> {
    let mut depth = 0_usize;
    let mut lines = Vec::new();

    for (idx, raw) in src.lines().enumerate() {
        let line_no = idx + 1;
        let pieces = lex_line(raw).map_err(|message| ConvertError::Serialization {
            message: format!("line {line_no}: {message}"),
        })?;
        lines.push(classify(&pieces, &mut depth, line_no)?);
    }

    if depth != 0 {
        return Err(ConvertError::Serialization {
            message: format!("{depth} unclosed bracket(s) at end of input"),
        });
    }

    let lines = prune_blanks(lines);
    let widths = alignment_widths(&lines);

    let mut out = String::with_capacity(src.len());
    for (line, width) in lines.iter().zip(widths) {
        match line {
            Line::Blank => {}
            Line::Text { indent, text, .. } => {
                out.push_str(&INDENT.repeat(*indent));
                out.push_str(text);
            }
            Line::Attribute {
                indent, key, value, ..
            } => {
                out.push_str(&INDENT.repeat(*indent));
                out.push_str(key);
                let pad = width.saturating_sub(key.chars().count());
                out.push_str(&" ".repeat(pad));
                out.push_str(" =");
                if !value.is_empty() {
                    out.push(' ');
                    out.push_str(value);
                }
            }
        }
        out.push('\n');
    }

    tracing::trace!(lines = lines.len(), "formatted HCL");
    Ok(out)
}
