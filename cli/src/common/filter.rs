//! # bakefs Filter Expressions
//!
//! File: cli/src/common/filter.rs
//!
//! ## Overview
//!
//! Directory iteration can be narrowed by a filter expression. The iterator
//! only needs four things from a filter: compile a pattern string, run the
//! compiled program against a path, ask for the program's scope, and free
//! it. Those are expressed here as two traits:
//!
//! - **`FilterCompiler`**: `compile(pattern) -> Box<dyn FilterProgram>`.
//! - **`FilterProgram`**: `run(path) -> bool` and `scope() -> Scope`.
//!   Freeing is dropping the box.
//!
//! The scope decides how a directory is listed: a `Flat` program is tested
//! against bare entry names of a single directory, a `Recursive` program is
//! tested against full paths of every entry in the subtree.
//!
//! ## Default compiler
//!
//! `GlobCompiler` builds programs from glob syntax using `globset`:
//!
//! - Alternatives are separated by `|`: `*.c|*.h`.
//! - `*` does not cross `/`; `**` does.
//! - A leading `//` is shorthand for `**/` ("anywhere below").
//! - Any alternative containing `**` (or starting with `//`) makes the
//!   whole program `Recursive`; otherwise it is `Flat`.
//!
//! ```rust
//! use bakefs::common::filter::{compile, Scope};
//!
//! let flat = compile("*.c|*.h").unwrap();
//! assert_eq!(flat.scope(), Scope::Flat);
//! assert!(flat.run("main.c"));
//!
//! let deep = compile("//*.o").unwrap();
//! assert_eq!(deep.scope(), Scope::Recursive);
//! assert!(deep.run("/work/build/obj/main.o"));
//! ```
//!
use crate::core::error::{FsError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fmt;
use tracing::debug;

/// Whether a compiled filter applies to one directory level or a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Flat,
    Recursive,
}

/// A compiled predicate over path strings.
pub trait FilterProgram: fmt::Debug + Send + Sync {
    /// Returns `true` if `path` matches.
    fn run(&self, path: &str) -> bool;

    fn scope(&self) -> Scope;
}

/// Turns pattern strings into runnable programs.
pub trait FilterCompiler {
    /// # Errors
    ///
    /// Returns `FilterCompileError` if the pattern is not valid syntax.
    fn compile(&self, pattern: &str) -> Result<Box<dyn FilterProgram>>;
}

/// Glob-based compiler. See the module docs for the syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobCompiler;

/// Program produced by [`GlobCompiler`].
#[derive(Debug)]
pub struct GlobProgram {
    pattern: String,
    set: GlobSet,
    scope: Scope,
}

impl GlobProgram {
    /// The source pattern this program was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl FilterProgram for GlobProgram {
    fn run(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    fn scope(&self) -> Scope {
        self.scope
    }
}

impl FilterCompiler for GlobCompiler {
    fn compile(&self, pattern: &str) -> Result<Box<dyn FilterProgram>> {
        let compile_err = |reason: String| FsError::FilterCompile {
            pattern: pattern.to_string(),
            reason,
        };

        let alternatives: Vec<&str> = pattern.split('|').map(str::trim).collect();
        if alternatives.iter().any(|alt| alt.is_empty()) {
            return Err(compile_err("empty alternative".to_string()));
        }

        let mut scope = Scope::Flat;
        let mut builder = GlobSetBuilder::new();
        for alt in alternatives {
            let source = match alt.strip_prefix("//") {
                Some(rest) => format!("**/{}", rest),
                None => alt.to_string(),
            };
            if source.contains("**") {
                scope = Scope::Recursive;
            }
            let glob = GlobBuilder::new(&source)
                .literal_separator(true)
                .build()
                .map_err(|e| compile_err(e.kind().to_string()))?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| compile_err(e.to_string()))?;

        debug!("Compiled filter '{}' ({:?})", pattern, scope);
        Ok(Box::new(GlobProgram {
            pattern: pattern.to_string(),
            set,
            scope,
        }))
    }
}

/// Compiles `pattern` with the default [`GlobCompiler`].
pub fn compile(pattern: &str) -> Result<Box<dyn FilterProgram>> {
    GlobCompiler.compile(pattern)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[test]
    fn test_flat_pattern_matches_names() -> Result<()> {
        let program = compile("*.txt")?;
        assert_eq!(program.scope(), Scope::Flat);
        assert!(program.run("notes.txt"));
        assert!(!program.run("notes.md"));
        // `*` stays within one segment.
        assert!(!program.run("dir/notes.txt"));
        Ok(())
    }

    #[test]
    fn test_alternatives() -> Result<()> {
        let program = compile("*.c | *.h")?;
        assert!(program.run("a.c"));
        assert!(program.run("a.h"));
        assert!(!program.run("a.o"));
        Ok(())
    }

    #[test]
    fn test_recursive_scope_from_double_star() -> Result<()> {
        let program = compile("**/*.txt")?;
        assert_eq!(program.scope(), Scope::Recursive);
        assert!(program.run("/tmp/root/keep/drop/match.txt"));
        assert!(program.run("root/match.txt"));
        assert!(!program.run("/tmp/root/keep"));
        Ok(())
    }

    #[test]
    fn test_leading_double_slash_is_anywhere_below() -> Result<()> {
        let program = compile("//build/*.o")?;
        assert_eq!(program.scope(), Scope::Recursive);
        assert!(program.run("/proj/build/main.o"));
        assert!(!program.run("/proj/src/main.o"));
        Ok(())
    }

    #[test]
    fn test_one_recursive_alternative_makes_program_recursive() -> Result<()> {
        let program = compile("*.md|//*.rs")?;
        assert_eq!(program.scope(), Scope::Recursive);
        Ok(())
    }

    #[test]
    fn test_invalid_patterns() {
        let err = compile("[abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FilterCompileError);

        let err = compile("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FilterCompileError);

        let err = compile("*.c||*.h").unwrap_err();
        assert!(err.to_string().contains("empty alternative"));
    }
}
