//! # bakefs Directory Stack
//!
//! File: cli/src/common/fs/dirstack.rs
//!
//! ## Overview
//!
//! A stack of directory paths tracking the current position during a
//! recursive traversal. Each frame is the previous frame plus `/` plus one
//! directory name, so the top of the stack is always the full path of the
//! directory being processed, built without re-concatenating from the root
//! at every level.
//!
//! ## Pairing pushes and pops
//!
//! Every push must be undone on every way out of the scope that pushed it,
//! including early `?` returns. `DirStack::enter` returns a `DirFrame` guard
//! that pops in its `Drop` impl, and dereferences to the stack so deeper
//! levels can `enter` through it:
//!
//! ```rust
//! use bakefs::common::fs::dirstack::DirStack;
//!
//! let mut stack = DirStack::push(None, "/src");
//! {
//!     let mut frame = stack.enter("lib");
//!     assert_eq!(frame.path(), "/src/lib");
//!     let inner = frame.enter("util");
//!     assert_eq!(inner.path(), "/src/lib/util");
//! } // both frames popped here
//! assert_eq!(stack.current_path(), Some("/src"));
//! ```
//!
use std::ops::{Deref, DerefMut};

/// Ordered stack of absolute working paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirStack {
    frames: Vec<String>,
}

impl DirStack {
    /// Pushes `segment` onto `stack`, creating the stack if there is none.
    ///
    /// A new stack is seeded with `segment` as-is. An existing stack gets
    /// `current_path() + "/" + segment`. The returned stack is the one to
    /// use from here on.
    pub fn push(stack: Option<DirStack>, segment: &str) -> DirStack {
        let mut stack = stack.unwrap_or_default();
        stack.push_segment(segment);
        stack
    }

    fn push_segment(&mut self, segment: &str) {
        let next = match self.frames.last() {
            Some(top) => format!("{}/{}", top, segment),
            None => segment.to_string(),
        };
        self.frames.push(next);
    }

    /// Removes the deepest frame and returns it.
    pub fn pop(&mut self) -> Option<String> {
        self.frames.pop()
    }

    /// The deepest frame: the directory currently being processed.
    pub fn current_path(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }

    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pushes `segment` and returns a guard that pops it when dropped.
    pub fn enter(&mut self, segment: &str) -> DirFrame<'_> {
        self.push_segment(segment);
        DirFrame { stack: self }
    }
}

/// Scope guard for one pushed frame. Pops on drop.
#[derive(Debug)]
pub struct DirFrame<'a> {
    stack: &'a mut DirStack,
}

impl DirFrame<'_> {
    /// Path of the frame this guard pushed.
    pub fn path(&self) -> &str {
        // The guard's own frame is on the stack for as long as the guard lives.
        self.stack.current_path().unwrap_or_default()
    }
}

impl Deref for DirFrame<'_> {
    type Target = DirStack;

    fn deref(&self) -> &DirStack {
        self.stack
    }
}

impl DerefMut for DirFrame<'_> {
    fn deref_mut(&mut self) -> &mut DirStack {
        self.stack
    }
}

impl Drop for DirFrame<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}
