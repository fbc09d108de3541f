//! Highlight driver
//!
//! Picks a syntax for a file from its name and content and renders the
//! content as self-contained HTML.

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use lazy_static::lazy_static;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::cli::HighlightArgs;
use crate::error::{Error, Result};

/// Bundled theme used for inline styles
pub const THEME_NAME: &str = "InspiredGitHub";

lazy_static! {
    /// Basenames whose lexer is known to be guessed wrong, mapped to a
    /// filename that resolves to the right one
    static ref NAME_OVERRIDES: HashMap<&'static str, &'static str> =
        HashMap::from([("Makefile.py", ".py")]);
}

/// How a syntax was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Override,
    Filename,
    Content,
    PlainText,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Selection::Override => "name override",
            Selection::Filename => "filename",
            Selection::Content => "content",
            Selection::PlainText => "fallback",
        };
        f.write_str(label)
    }
}

/// The syntax chosen for a file
#[derive(Debug, Clone, Copy)]
pub struct LexerChoice<'a> {
    pub syntax: &'a SyntaxReference,
    pub selection: Selection,
}

impl LexerChoice<'_> {
    pub fn name(&self) -> &str {
        &self.syntax.name
    }
}

impl fmt::Display for LexerChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} ({})>", self.syntax.name, self.selection)
    }
}

/// Select a syntax for `filename` holding `content`
///
/// Tries, in order: the override table, the filename (whole basename, then
/// extension, using the content to break ties), the content alone, and
/// finally plain text. Never fails.
pub fn select_lexer<'a>(syntaxes: &'a SyntaxSet, filename: &str, content: &str) -> LexerChoice<'a> {
    let overridden = NAME_OVERRIDES.get(basename(filename)).copied();
    let effective = overridden.unwrap_or(filename);

    if let Some(syntax) = find_by_filename(syntaxes, effective, content) {
        let selection = if overridden.is_some() {
            Selection::Override
        } else {
            Selection::Filename
        };
        return LexerChoice { syntax, selection };
    }

    if let Some(syntax) = syntaxes.find_syntax_by_first_line(first_line(content)) {
        return LexerChoice {
            syntax,
            selection: Selection::Content,
        };
    }

    LexerChoice {
        syntax: syntaxes.find_syntax_plain_text(),
        selection: Selection::PlainText,
    }
}

fn basename(filename: &str) -> &str {
    filename.rsplit(['/', '\\']).next().unwrap_or(filename)
}

fn first_line(content: &str) -> &str {
    content.lines().next().unwrap_or("")
}

fn find_by_filename<'a>(
    syntaxes: &'a SyntaxSet,
    filename: &str,
    content: &str,
) -> Option<&'a SyntaxReference> {
    let name = basename(filename);
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty());

    std::iter::once(name)
        .chain(extension)
        .filter(|token| !token.is_empty())
        .find_map(|token| find_by_token(syntaxes, token, content))
}

/// The syntax claiming `token`; when several do, the one whose first-line
/// pattern accepts the content
fn find_by_token<'a>(
    syntaxes: &'a SyntaxSet,
    token: &str,
    content: &str,
) -> Option<&'a SyntaxReference> {
    let claimants: Vec<&SyntaxReference> = syntaxes
        .syntaxes()
        .iter()
        .filter(|s| s.file_extensions.iter().any(|e| e.eq_ignore_ascii_case(token)))
        .collect();

    if claimants.len() > 1 {
        if let Some(by_content) = syntaxes.find_syntax_by_first_line(first_line(content)) {
            if let Some(found) = claimants.iter().find(|s| s.name == by_content.name) {
                log::debug!(
                    "{} claimed by {} syntaxes, content picked {}",
                    token,
                    claimants.len(),
                    found.name
                );
                return Some(*found);
            }
        }
    }

    claimants.first().copied()
}

/// Renders content to HTML with the bundled syntaxes and theme
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new() -> Result<Self> {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(THEME_NAME)
            .ok_or_else(|| Error::Config(format!("missing bundled theme {}", THEME_NAME)))?;

        Ok(Self { syntaxes, theme })
    }

    pub fn select(&self, filename: &str, content: &str) -> LexerChoice<'_> {
        select_lexer(&self.syntaxes, filename, content)
    }

    /// Render `content` as a `<pre>` block with inline styles
    pub fn render(&self, content: &str, lexer: &LexerChoice) -> Result<String> {
        Ok(highlighted_html_for_string(
            content,
            &self.syntaxes,
            lexer.syntax,
            &self.theme,
        )?)
    }
}

/// Read the text to highlight, from `filename` or from stdin
pub fn read_input(filename: &Path, from_stdin: bool) -> Result<String> {
    if from_stdin {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    std::fs::read_to_string(filename).map_err(|source| Error::ReadInput {
        path: filename.display().to_string(),
        source,
    })
}

/// Highlight driver entry point
pub fn run(args: HighlightArgs) -> Result<()> {
    let content = read_input(&args.filename, args.reads_stdin())?;
    let filename = args.filename.to_string_lossy();

    let highlighter = Highlighter::new()?;
    let lexer = highlighter.select(&filename, &content);
    eprintln!("lexer: {}", lexer);

    let html = highlighter.render(&content, &lexer)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
