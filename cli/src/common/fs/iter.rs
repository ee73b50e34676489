//! # bakefs Directory Iteration
//!
//! File: cli/src/common/fs/iter.rs
//!
//! ## Overview
//!
//! `open_dir_iter` is the single way the crate (and its callers) read a
//! directory. It hands back a `DirIterator`, a lazy cursor with the same
//! `has_next` / `next_entry` / `release` surface whatever is behind it:
//!
//! 1. **Plain** (no filter): reads the directory handle directly and yields
//!    bare entry names. Callers join them with the base directory
//!    themselves.
//! 2. **Filtered** (filter with `Scope::Flat`): like Plain, but entries for
//!    which the filter program returns `false` are skipped. The program is
//!    run against the bare entry name.
//! 3. **Recursive** (filter with `Scope::Recursive`): the subtree is walked
//!    depth-first when the iterator is opened. Every entry's cleaned full
//!    path (`<dir>/<name>`) is tested against the filter and matches are
//!    collected; iteration then walks the collected list. Directories are
//!    descended into whether or not they matched, and a directory's own
//!    match precedes its descendants'.
//!
//! Entries whose names start with `.` are never yielded by any variant.
//!
//! ## Architecture
//!
//! - `DirIterator` is an enum over the three cursors; callers never need to
//!   match on it.
//! - Each variant owns its resources (`ReadDir` handle, boxed filter
//!   program, or collected paths). `release` consumes the iterator and
//!   drops them; simply dropping the iterator does the same.
//! - The recursive walk tracks the current directory on a `DirStack`, using
//!   `DirFrame` guards so an error deep in the walk leaves no stray frames.
//! - If any directory in the subtree cannot be opened or read, the whole
//!   recursive open fails and no partial list is returned.
//! - A directory reached again through a link (`self -> .`, or two links to
//!   the same place) is walked only the first time. Links to directories
//!   outside the subtree are followed.
//!
//! ## Usage
//!
//! ```rust
//! use bakefs::common::fs::iter::open_dir_iter;
//!
//! # fn run() -> bakefs::Result<()> {
//! // Bare names of the C sources directly in `src`.
//! let mut it = open_dir_iter(Some("src"), Some("*.c"))?;
//! while it.has_next() {
//!     let name = it.next_entry().unwrap_or_default();
//!     println!("src/{}", name);
//! }
//! it.release();
//!
//! // Full paths of every object file under `build`.
//! for path in open_dir_iter(Some("build"), Some("//*.o"))? {
//!     println!("{}", path);
//! }
//! # Ok(())
//! # }
//! ```
//!
use crate::common::filter::{FilterCompiler, FilterProgram, GlobCompiler, Scope};
use crate::common::fs::dirstack::DirStack;
use crate::common::fs::{path, probe};
use crate::core::error::{FsError, Result};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, ReadDir};
use std::io;
use std::iter::Peekable;
use std::path::PathBuf;
use std::vec;
use tracing::{debug, warn};

/// Lazy cursor over directory entries. See the module docs for variants.
#[derive(Debug)]
pub enum DirIterator {
    Plain(PlainIter),
    Filtered(FilteredIter),
    Recursive(RecursiveIter),
}

/// Unfiltered listing of one directory.
#[derive(Debug)]
pub struct PlainIter {
    dir: String,
    handle: ReadDir,
    pending: Option<String>,
}

/// Listing of one directory, gated by a flat-scope filter.
#[derive(Debug)]
pub struct FilteredIter {
    dir: String,
    handle: ReadDir,
    program: Box<dyn FilterProgram>,
    pending: Option<String>,
}

/// Pre-collected matches from a recursive walk.
#[derive(Debug)]
pub struct RecursiveIter {
    matches: Peekable<vec::IntoIter<String>>,
}

/// Returns the next name from `names` that does not start with `.`.
fn next_visible<I>(names: I, dir: &str) -> io::Result<Option<String>>
where
    I: Iterator<Item = io::Result<OsString>>,
{
    for name in names {
        match name?.into_string() {
            Ok(name) if name.starts_with('.') => continue,
            Ok(name) => return Ok(Some(name)),
            Err(raw) => {
                warn!("Skipping non UTF-8 entry {:?} in '{}'", raw, dir);
            }
        }
    }
    Ok(None)
}

fn read_names(handle: &mut ReadDir) -> impl Iterator<Item = io::Result<OsString>> + '_ {
    handle.map(|entry| entry.map(|e| e.file_name()))
}

fn open_handle(dir: &str) -> Result<ReadDir> {
    fs::read_dir(dir).map_err(|e| FsError::io("opendir", dir, e))
}

/// A read error on the public cursor ends the listing.
fn end_on_error(filled: io::Result<bool>, dir: &str) -> bool {
    filled.unwrap_or_else(|e| {
        warn!("Stopped reading directory '{}': {}", dir, e);
        false
    })
}

impl PlainIter {
    fn try_fill(&mut self) -> io::Result<bool> {
        if self.pending.is_none() {
            self.pending = next_visible(read_names(&mut self.handle), &self.dir)?;
        }
        Ok(self.pending.is_some())
    }
}

impl FilteredIter {
    fn try_fill(&mut self) -> io::Result<bool> {
        while self.pending.is_none() {
            let name = match next_visible(read_names(&mut self.handle), &self.dir)? {
                Some(name) => name,
                None => return Ok(false),
            };
            if self.program.run(&name) {
                self.pending = Some(name);
            }
        }
        Ok(true)
    }
}

impl DirIterator {
    /// Opens an unfiltered iterator over `dir`.
    pub fn plain(dir: &str) -> Result<Self> {
        Ok(DirIterator::Plain(PlainIter {
            dir: dir.to_string(),
            handle: open_handle(dir)?,
            pending: None,
        }))
    }

    /// Opens `dir` with a program chosen by its scope. Takes ownership of
    /// `program`; it is dropped together with the iterator.
    pub fn with_program(dir: &str, program: Box<dyn FilterProgram>) -> Result<Self> {
        match program.scope() {
            Scope::Flat => Ok(DirIterator::Filtered(FilteredIter {
                dir: dir.to_string(),
                handle: open_handle(dir)?,
                program,
                pending: None,
            })),
            Scope::Recursive => {
                let matches = collect_recursive(dir, program.as_ref())?;
                // The program is no longer needed once matching is done.
                drop(program);
                Ok(DirIterator::Recursive(RecursiveIter {
                    matches: matches.into_iter().peekable(),
                }))
            }
        }
    }

    /// Returns `true` if another entry is available. Advances the
    /// underlying directory handle as needed, but never past the entry it
    /// reports.
    ///
    /// A read error part-way through a directory is logged and ends the
    /// listing.
    pub fn has_next(&mut self) -> bool {
        match self {
            DirIterator::Plain(it) => end_on_error(it.try_fill(), &it.dir),
            DirIterator::Filtered(it) => end_on_error(it.try_fill(), &it.dir),
            DirIterator::Recursive(it) => it.matches.peek().is_some(),
        }
    }

    /// Like [`DirIterator::next_entry`], but a read error is returned
    /// instead of ending the listing. Used by walks that must not act on a
    /// partial listing.
    pub(crate) fn try_next_entry(&mut self) -> Result<Option<String>> {
        match self {
            DirIterator::Plain(it) => {
                it.try_fill()
                    .map_err(|e| FsError::io("readdir", it.dir.clone(), e))?;
                Ok(it.pending.take())
            }
            DirIterator::Filtered(it) => {
                it.try_fill()
                    .map_err(|e| FsError::io("readdir", it.dir.clone(), e))?;
                Ok(it.pending.take())
            }
            DirIterator::Recursive(it) => Ok(it.matches.next()),
        }
    }

    /// Returns the next entry, or `None` when exhausted.
    pub fn next_entry(&mut self) -> Option<String> {
        if !self.has_next() {
            return None;
        }
        match self {
            DirIterator::Plain(it) => it.pending.take(),
            DirIterator::Filtered(it) => it.pending.take(),
            DirIterator::Recursive(it) => it.matches.next(),
        }
    }

    /// Releases the directory handle, filter program, or collected list.
    pub fn release(self) {
        debug!("Released {}", self.describe());
    }

    fn describe(&self) -> String {
        match self {
            DirIterator::Plain(it) => format!("plain iterator over '{}'", it.dir),
            DirIterator::Filtered(it) => format!("filtered iterator over '{}'", it.dir),
            DirIterator::Recursive(_) => "recursive iterator".to_string(),
        }
    }
}

impl Iterator for DirIterator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_entry()
    }
}

/// Opens an iterator over `path`, optionally filtered, compiling the filter
/// with the default [`GlobCompiler`].
///
/// # Errors
///
/// - `InvalidArgument` if `path` is `None` or empty.
/// - `FilterCompileError` if `filter` does not compile.
/// - The open failure (`NotFound`, `PermissionDenied`, `IoFailure`) of the
///   directory, or, for a recursive filter, of any directory in the subtree.
pub fn open_dir_iter(path: Option<&str>, filter: Option<&str>) -> Result<DirIterator> {
    open_dir_iter_with(path, filter, &GlobCompiler)
}

/// Like [`open_dir_iter`], with a caller-supplied filter compiler.
pub fn open_dir_iter_with(
    path: Option<&str>,
    filter: Option<&str>,
    compiler: &dyn FilterCompiler,
) -> Result<DirIterator> {
    let dir = match path {
        Some(dir) if !dir.is_empty() => dir,
        Some(_) => return Err(FsError::invalid("open_dir_iter", "empty directory name")),
        None => {
            return Err(FsError::invalid(
                "open_dir_iter",
                "invalid 'null' provided as directory name",
            ))
        }
    };

    let iter = match filter {
        None => DirIterator::plain(dir)?,
        Some(pattern) => {
            let program = compiler.compile(pattern)?;
            DirIterator::with_program(dir, program)?
        }
    };
    debug!("Opened {}", iter.describe());
    Ok(iter)
}

/// Opens one directory of a recursive walk.
type DirOpener<'a> = &'a dyn Fn(&str) -> Result<DirIterator>;

/// Walks the subtree under `root` and returns every cleaned path that
/// `program` accepts, in depth-first listing order.
fn collect_recursive(root: &str, program: &dyn FilterProgram) -> Result<Vec<String>> {
    walk_matching(root, program, &DirIterator::plain)
}

fn walk_matching(
    root: &str,
    program: &dyn FilterProgram,
    open: DirOpener<'_>,
) -> Result<Vec<String>> {
    let mut walk = MatchWalk {
        program,
        open,
        visited: HashSet::new(),
        matches: Vec::new(),
    };
    let mut stack = DirStack::push(None, root);
    walk.first_visit(root)
        .and_then(|_| walk.collect_dir(&mut stack))
        .map_err(|e| FsError::nested("dir_iter", root, e))?;
    debug!(
        "Recursive filter under '{}' matched {} entries",
        root,
        walk.matches.len()
    );
    Ok(walk.matches)
}

/// State of one recursive walk. `visited` holds the resolved path of every
/// directory entered, so a directory aliased by a link is walked once.
struct MatchWalk<'a> {
    program: &'a dyn FilterProgram,
    open: DirOpener<'a>,
    visited: HashSet<PathBuf>,
    matches: Vec<String>,
}

impl MatchWalk<'_> {
    fn first_visit(&mut self, dir: &str) -> Result<bool> {
        let real = fs::canonicalize(dir).map_err(|e| FsError::io("dir_iter", dir, e))?;
        Ok(self.visited.insert(real))
    }

    fn collect_dir(&mut self, stack: &mut DirStack) -> Result<()> {
        let wd = stack.current_path().unwrap_or(".").to_string();
        let mut entries = (self.open)(&wd)?;

        while let Some(name) = entries.try_next_entry()? {
            let full = path::join(&wd, &name);
            if self.program.run(&full) {
                self.matches.push(full.clone());
            }
            // Descend whether or not the directory itself matched.
            if probe::is_directory(&full) {
                if !self.first_visit(&full)? {
                    debug!("Skipping {}: directory already walked", full);
                    continue;
                }
                let mut frame = stack.enter(&name);
                self.collect_dir(&mut frame)?;
            }
        }
        Ok(())
    }
}

/// Lists the visible entry names of `dir` into a vector.
///
/// # Errors
///
/// Returns the open failure of `dir`.
pub fn list_dir(dir: &str) -> Result<Vec<String>> {
    Ok(DirIterator::plain(dir)?.collect())
}

/// Returns `true` if `dir` has no visible entries. A directory that cannot
/// be opened is reported as empty.
pub fn dir_is_empty(dir: &str) -> bool {
    match DirIterator::plain(dir) {
        Ok(mut it) => !it.has_next(),
        Err(_) => true,
    }
}
