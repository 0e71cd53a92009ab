//! Comment syntax detection from file names and magic prefixes.

use bitflags::bitflags;

use crate::Buffer;

bitflags! {
    /// The comment styles enabled for a file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LanguageSyntax: u16 {
        /// `// ...` until end of line
        const DOUBLE_SLASH_LINE = 1;
        /// `# ...` until end of line
        const HASH_LINE = 1 << 1;
        /// `/* ... */`
        const SLASH_STAR_BLOCK = 1 << 8;
        /// `<# ... #>`
        const ANGLE_HASH_BLOCK = 1 << 9;
        /// `''' ... '''`
        const TRIPLE_SINGLE_QUOTE_BLOCK = 1 << 10;
        /// `""" ... """`
        const TRIPLE_DOUBLE_QUOTE_BLOCK = 1 << 11;

        const C_LIKE = Self::DOUBLE_SLASH_LINE.bits() | Self::SLASH_STAR_BLOCK.bits();
        const PYTHON = Self::HASH_LINE.bits()
            | Self::TRIPLE_SINGLE_QUOTE_BLOCK.bits()
            | Self::TRIPLE_DOUBLE_QUOTE_BLOCK.bits();
        const PHP = Self::DOUBLE_SLASH_LINE.bits()
            | Self::HASH_LINE.bits()
            | Self::SLASH_STAR_BLOCK.bits();
        const SHELL = Self::HASH_LINE.bits() | Self::ANGLE_HASH_BLOCK.bits();
    }
}

/// Where a comment ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// At the next newline (inclusive)
    EndOfLine,
    /// At the given close delimiter (inclusive)
    Delimiter(&'static str),
}

/// A single comment style: its enabling flag, opening marker and terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentStyle {
    pub syntax: LanguageSyntax,
    pub open: &'static str,
    pub terminator: Terminator,
}

/// All known comment styles, in the order they are tested at each position
pub const COMMENT_STYLES: [CommentStyle; 6] = [
    CommentStyle {
        syntax: LanguageSyntax::DOUBLE_SLASH_LINE,
        open: "//",
        terminator: Terminator::EndOfLine,
    },
    CommentStyle {
        syntax: LanguageSyntax::HASH_LINE,
        open: "#",
        terminator: Terminator::EndOfLine,
    },
    CommentStyle {
        syntax: LanguageSyntax::SLASH_STAR_BLOCK,
        open: "/*",
        terminator: Terminator::Delimiter("*/"),
    },
    CommentStyle {
        syntax: LanguageSyntax::ANGLE_HASH_BLOCK,
        open: "<#",
        terminator: Terminator::Delimiter("#>"),
    },
    CommentStyle {
        syntax: LanguageSyntax::TRIPLE_SINGLE_QUOTE_BLOCK,
        open: "'''",
        terminator: Terminator::Delimiter("'''"),
    },
    CommentStyle {
        syntax: LanguageSyntax::TRIPLE_DOUBLE_QUOTE_BLOCK,
        open: "\"\"\"",
        terminator: Terminator::Delimiter("\"\"\""),
    },
];

const EXTENSIONS: [(&[&str], LanguageSyntax); 4] = [
    (
        &[
            "c", "h", "cc", "cpp", "cxx", "hpp", "c++", "cs", "java", "rs", "rlib", "d", "js",
        ],
        LanguageSyntax::C_LIKE,
    ),
    (
        &["py", "pyc", "pyd", "pyo", "pyw", "pyz"],
        LanguageSyntax::PYTHON,
    ),
    (
        &["php", "phtml", "php3", "php4", "php5", "php7", "phps"],
        LanguageSyntax::PHP,
    ),
    (
        &["bash", "tcl", "csh", "mpl", "mla", "ps1", "m", "r", "sh"],
        LanguageSyntax::SHELL,
    ),
];

const MAGIC_PREFIXES: [(&str, LanguageSyntax); 11] = [
    ("#!/usr/bin/env py", LanguageSyntax::PYTHON),
    ("#!/usr/bin/python", LanguageSyntax::PYTHON),
    ("#!/usr/bin/env php", LanguageSyntax::PHP),
    ("#!/bin/bash", LanguageSyntax::SHELL),
    ("#!/bin/sh", LanguageSyntax::SHELL),
    ("#!/bin/csh", LanguageSyntax::SHELL),
    ("#!/usr/bin/awk", LanguageSyntax::SHELL),
    ("#!/usr/bin/Rscript", LanguageSyntax::SHELL),
    ("#!/usr/bin/env bash", LanguageSyntax::SHELL),
    ("#!/usr/bin/env sh", LanguageSyntax::SHELL),
    ("#!/usr/bin/env Rscript", LanguageSyntax::SHELL),
];

impl LanguageSyntax {
    /// Resolve the comment syntax of a file.
    ///
    /// The extension (text after the last `.` of the file name) is consulted first. When it is
    /// missing or unknown, the start of the buffer is matched against known interpreter
    /// prefixes. Unknown files resolve to an empty syntax.
    pub fn resolve(filename: &str, buffer: &Buffer) -> Self {
        Self::from_extension(filename)
            .or_else(|| Self::from_magic(buffer))
            .unwrap_or_default()
    }

    /// Resolve from the file extension alone
    pub fn from_extension(filename: &str) -> Option<Self> {
        let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        let (_, extension) = name.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();

        EXTENSIONS
            .iter()
            .find(|(extensions, _)| extensions.contains(&extension.as_str()))
            .map(|&(_, syntax)| syntax)
    }

    /// Resolve from a shebang or other magic prefix at the start of the buffer
    pub fn from_magic(buffer: &Buffer) -> Option<Self> {
        MAGIC_PREFIXES
            .iter()
            .find(|(prefix, _)| buffer.starts_with_at(0, prefix))
            .map(|&(_, syntax)| syntax)
    }

    /// Iterate the comment styles enabled by this syntax, in testing order
    pub fn styles(self) -> impl Iterator<Item = &'static CommentStyle> {
        COMMENT_STYLES
            .iter()
            .filter(move |style| self.contains(style.syntax))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_resolution() {
        let empty = Buffer::default();
        assert_eq!(
            LanguageSyntax::resolve("src/main.rs", &empty),
            LanguageSyntax::C_LIKE
        );
        assert_eq!(
            LanguageSyntax::resolve("/home/me/tool.PY", &empty),
            LanguageSyntax::PYTHON
        );
        assert_eq!(
            LanguageSyntax::resolve("index.php", &empty),
            LanguageSyntax::PHP
        );
        assert_eq!(
            LanguageSyntax::resolve("build.sh", &empty),
            LanguageSyntax::SHELL
        );
        assert_eq!(
            LanguageSyntax::resolve("notes.txt", &empty),
            LanguageSyntax::empty()
        );
    }

    #[test]
    fn test_last_dot_wins() {
        let empty = Buffer::default();
        assert_eq!(
            LanguageSyntax::resolve("archive.tar.c", &empty),
            LanguageSyntax::C_LIKE
        );
        // A dot in a directory name is not an extension
        assert_eq!(LanguageSyntax::from_extension("dir.c/Makefile"), None);
    }

    #[test]
    fn test_magic_resolution() {
        let script = Buffer::from("#!/bin/sh\necho hi\n");
        assert_eq!(
            LanguageSyntax::resolve("script", &script),
            LanguageSyntax::SHELL
        );

        let python = Buffer::from("#!/usr/bin/env python3\nprint()\n");
        assert_eq!(
            LanguageSyntax::resolve("/dev/stdin", &python),
            LanguageSyntax::PYTHON
        );
    }

    #[test]
    fn test_extension_beats_magic() {
        let script = Buffer::from("#!/bin/sh\n");
        assert_eq!(
            LanguageSyntax::resolve("weird.rs", &script),
            LanguageSyntax::C_LIKE
        );
    }

    #[test]
    fn test_styles_order() {
        let opens: Vec<&str> = LanguageSyntax::PHP.styles().map(|style| style.open).collect();
        assert_eq!(opens, vec!["//", "#", "/*"]);
        assert_eq!(LanguageSyntax::empty().styles().count(), 0);
    }
}
