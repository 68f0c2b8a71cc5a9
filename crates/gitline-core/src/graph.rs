#![forbid(unsafe_code)]

//! Branch registry and append-only event log.
//!
//! A [`Graph`] is populated by a builder through a small mutation surface
//! (`create_branch`, `start`, `commit`, `merge`, `delete_branch`, `end`) and
//! then handed, read-only, to the normalizer.
//!
//! # Positions
//!
//! Every event receives an integer position from a shared counter. Events
//! recorded before [`Graph::start`] are rebased when START arrives so that
//! START sits at position 0 and everything earlier is negative. In-place
//! events share the position of the event recorded before them, leave the
//! counter untouched and never carry a message.
//!
//! # Example
//!
//! ```
//! use gitline_core::{BranchOptions, CommitOptions, Graph};
//!
//! let mut graph = Graph::new();
//! graph.create_branch("master", BranchOptions::default(), CommitOptions::default())?;
//! graph.start()?;
//! graph
//!     .branch_mut("master")?
//!     .branch("feature", BranchOptions::default(), "branch from master")?
//!     .commit("work 1")?;
//! graph.merge("master", "feature", CommitOptions::default())?;
//! assert_eq!(graph.position(), 4);
//! # Ok::<(), gitline_core::GraphError>(())
//! ```

use bitflags::bitflags;
use serde::Serialize;
use tracing::{debug, trace};

use crate::color::Color;
use crate::error::GraphError;

bitflags! {
    /// Rendering hints attached to an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct EventFlags: u8 {
        /// Draw the line that reaches this event dashed.
        const DASHED = 0b0000_0001;
        /// The event shares its position with the previous one.
        const IN_PLACE = 0b0000_0010;
    }
}

/// What happened at a position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Start,
    /// Branch creation. `from` is only set for branches created after start.
    Branch {
        from: Option<String>,
    },
    Commit,
    Merge {
        from: String,
    },
    Delete,
    End,
    /// Slot filler synthesized by the normalizer; never stored in a log.
    Empty,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Branch { .. } => "BRANCH",
            Self::Commit => "COMMIT",
            Self::Merge { .. } => "MERGE",
            Self::Delete => "DELETE",
            Self::End => "END",
            Self::Empty => "EMPTY",
        }
    }

    /// The lineage this event draws from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Branch { from } => from.as_deref(),
            Self::Merge { from } => Some(from),
            Self::Start | Self::Commit | Self::Delete | Self::End | Self::Empty => None,
        }
    }
}

/// One entry of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Event {
    #[serde(flatten)]
    pub kind: EventKind,
    /// Owning branch. `None` for graph-level START/END.
    pub branch: Option<String>,
    pub position: i64,
    pub message: Option<String>,
    pub author: Option<String>,
    pub flags: EventFlags,
}

impl Event {
    /// A boundary or filler event with no message and no flags.
    #[must_use]
    pub fn synthetic(kind: EventKind, branch: impl Into<String>, position: i64) -> Self {
        Self {
            kind,
            branch: Some(branch.into()),
            position,
            message: None,
            author: None,
            flags: EventFlags::empty(),
        }
    }

    #[inline]
    pub fn is_in_place(&self) -> bool {
        self.flags.contains(EventFlags::IN_PLACE)
    }

    #[inline]
    pub fn is_dashed(&self) -> bool {
        self.flags.contains(EventFlags::DASHED)
    }
}

/// A named lineage in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub name: String,
    /// Explicit color; generated by the normalizer when absent.
    pub color: Option<Color>,
    /// Branch this one forked from, for branches created after start.
    pub origin: Option<String>,
}

/// Registry options for a new branch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchOptions {
    pub from: Option<String>,
    /// Display index. `None` appends; `Some(0)` inserts at the front.
    pub index: Option<usize>,
    pub color: Option<Color>,
}

impl BranchOptions {
    #[must_use]
    pub fn from(mut self, branch: impl Into<String>) -> Self {
        self.from = Some(branch.into());
        self
    }

    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Options for the event recorded by a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOptions {
    pub message: Option<String>,
    pub author: Option<String>,
    pub dashed: bool,
    /// `None` uses the operation's default (in place only for deletes).
    pub in_place: Option<bool>,
}

impl CommitOptions {
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    #[must_use]
    pub fn in_place(mut self, in_place: bool) -> Self {
        self.in_place = Some(in_place);
        self
    }
}

impl From<&str> for CommitOptions {
    fn from(message: &str) -> Self {
        Self::default().message(message)
    }
}

impl From<String> for CommitOptions {
    fn from(message: String) -> Self {
        Self::default().message(message)
    }
}

/// Lifecycle of a log: `Unstarted -> Started -> Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LogState {
    #[default]
    Unstarted,
    Started,
    Ended,
}

/// Branch registry plus event log for one diagram.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    branches: Vec<Branch>,
    events: Vec<Event>,
    state: LogState,
    position: i64,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered branches in display order.
    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Recorded events in insertion order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn state(&self) -> LogState {
        self.state
    }

    /// Current value of the shared position counter.
    #[must_use]
    pub fn position(&self) -> i64 {
        self.position
    }

    #[must_use]
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.name == name)
    }

    /// Display index of a registered branch.
    #[must_use]
    pub fn branch_index(&self, name: &str) -> Option<usize> {
        self.branches.iter().position(|branch| branch.name == name)
    }

    /// Register a new branch and record its BRANCH event.
    ///
    /// # Errors
    ///
    /// `DuplicateBranch` if the name is taken (checked before anything else),
    /// `GraphEnded` after [`end`](Self::end), `UnknownBranch` if the log has
    /// started and `options.from` names an unregistered branch.
    pub fn create_branch(
        &mut self,
        name: impl Into<String>,
        options: BranchOptions,
        commit: impl Into<CommitOptions>,
    ) -> Result<BranchMut<'_>, GraphError> {
        let name = name.into();
        if name.is_empty() {
            return Err(GraphError::EmptyBranchName);
        }
        if self.branch_index(&name).is_some() {
            return Err(GraphError::DuplicateBranch { name });
        }
        if self.state == LogState::Ended {
            return Err(GraphError::GraphEnded);
        }

        // Branches that exist before start are pre-existing, not created.
        let started = self.state == LogState::Started;
        let from = if started { options.from } else { None };
        if let Some(from) = &from {
            self.require_branch(from)?;
        }

        let index = options
            .index
            .map_or(self.branches.len(), |index| index.min(self.branches.len()));
        self.branches.insert(
            index,
            Branch {
                name: name.clone(),
                color: options.color,
                origin: from.clone(),
            },
        );
        debug!(branch = %name, index, from = ?from, started, "branch created");

        self.record(
            EventKind::Branch { from },
            Some(name.clone()),
            commit.into(),
            false,
        );
        Ok(BranchMut { graph: self, name })
    }

    /// Start the log. Earlier events are rebased to negative positions.
    ///
    /// # Errors
    ///
    /// `AlreadyStarted` on any call after the first.
    pub fn start(&mut self) -> Result<&mut Self, GraphError> {
        if self.state != LogState::Unstarted {
            return Err(GraphError::AlreadyStarted);
        }
        self.record(EventKind::Start, None, CommitOptions::default(), false);
        self.state = LogState::Started;
        debug!(events = self.events.len(), "graph started");
        Ok(self)
    }

    /// End the log and freeze it against further mutation.
    ///
    /// # Errors
    ///
    /// `NotStarted` before [`start`](Self::start), `AlreadyEnded` on repeat.
    pub fn end(&mut self) -> Result<&mut Self, GraphError> {
        match self.state {
            LogState::Unstarted => return Err(GraphError::NotStarted),
            LogState::Ended => return Err(GraphError::AlreadyEnded),
            LogState::Started => {}
        }
        self.record(EventKind::End, None, CommitOptions::default(), false);
        self.state = LogState::Ended;
        debug!(events = self.events.len(), position = self.position, "graph ended");
        Ok(self)
    }

    /// Record a commit on `branch`.
    ///
    /// # Errors
    ///
    /// `NotStarted`/`GraphEnded` outside the started state, `UnknownBranch`
    /// for an unregistered branch.
    pub fn commit(
        &mut self,
        branch: &str,
        options: impl Into<CommitOptions>,
    ) -> Result<&mut Self, GraphError> {
        self.require_open()?;
        self.require_branch(branch)?;
        self.record(EventKind::Commit, Some(branch.to_owned()), options.into(), false);
        Ok(self)
    }

    /// Record a merge of `source` into `target`.
    ///
    /// Without an explicit message the event reads
    /// `Merge branch '<source>' into <target>`.
    ///
    /// # Errors
    ///
    /// `NotStarted`/`GraphEnded` outside the started state, `UnknownBranch`
    /// if either branch is unregistered.
    pub fn merge(
        &mut self,
        target: &str,
        source: &str,
        options: impl Into<CommitOptions>,
    ) -> Result<&mut Self, GraphError> {
        self.require_open()?;
        self.require_branch(target)?;
        self.require_branch(source)?;

        let mut options = options.into();
        if options.message.is_none() {
            options.message = Some(format!("Merge branch '{source}' into {target}"));
        }
        self.record(
            EventKind::Merge {
                from: source.to_owned(),
            },
            Some(target.to_owned()),
            options,
            false,
        );
        Ok(self)
    }

    /// Record the deletion of `branch`. In place unless the options say otherwise.
    ///
    /// # Errors
    ///
    /// `NotStarted`/`GraphEnded` outside the started state, `UnknownBranch`
    /// for an unregistered branch.
    pub fn delete_branch(
        &mut self,
        branch: &str,
        options: impl Into<CommitOptions>,
    ) -> Result<&mut Self, GraphError> {
        self.require_open()?;
        self.require_branch(branch)?;
        self.record(EventKind::Delete, Some(branch.to_owned()), options.into(), true);
        Ok(self)
    }

    /// Chaining handle for an existing branch.
    ///
    /// # Errors
    ///
    /// `UnknownBranch` if `name` is not registered.
    pub fn branch_mut(&mut self, name: &str) -> Result<BranchMut<'_>, GraphError> {
        self.require_branch(name)?;
        Ok(BranchMut {
            graph: self,
            name: name.to_owned(),
        })
    }

    fn require_open(&self) -> Result<(), GraphError> {
        match self.state {
            LogState::Unstarted => Err(GraphError::NotStarted),
            LogState::Started => Ok(()),
            LogState::Ended => Err(GraphError::GraphEnded),
        }
    }

    fn require_branch(&self, name: &str) -> Result<(), GraphError> {
        match self.branch_index(name) {
            Some(_) => Ok(()),
            None => Err(GraphError::UnknownBranch {
                name: name.to_owned(),
            }),
        }
    }

    fn record(
        &mut self,
        kind: EventKind,
        branch: Option<String>,
        options: CommitOptions,
        default_in_place: bool,
    ) {
        if kind == EventKind::Start {
            let shift = self.position;
            for event in &mut self.events {
                event.position -= shift;
            }
            self.position = 0;
        }

        let in_place = options.in_place.unwrap_or(default_in_place);
        let mut flags = EventFlags::empty();
        flags.set(EventFlags::DASHED, options.dashed);
        flags.set(EventFlags::IN_PLACE, in_place);

        // Two events at one position cannot both show a message.
        let message = if in_place { None } else { options.message };

        let position = match self.events.last() {
            Some(previous) if in_place => previous.position,
            _ => self.position,
        };
        let event = Event {
            kind,
            branch,
            position,
            message,
            author: options.author,
            flags,
        };
        trace!(
            kind = event.kind.as_str(),
            branch = ?event.branch,
            position = event.position,
            in_place,
            "event recorded"
        );
        self.events.push(event);

        if !in_place {
            self.position += 1;
        }
    }
}

/// Mutable handle to one branch, for chained per-branch calls.
///
/// ```
/// # use gitline_core::{BranchOptions, CommitOptions, Graph};
/// let mut graph = Graph::new();
/// graph.create_branch("dev", BranchOptions::default(), CommitOptions::default())?;
/// graph.create_branch("feature", BranchOptions::default(), CommitOptions::default())?;
/// graph.start()?;
/// graph
///     .branch_mut("dev")?
///     .merge("feature", "feature v1")?
///     .merge("feature", "feature v2")?;
/// # Ok::<(), gitline_core::GraphError>(())
/// ```
#[derive(Debug)]
pub struct BranchMut<'g> {
    graph: &'g mut Graph,
    name: String,
}

impl<'g> BranchMut<'g> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// See [`Graph::commit`].
    pub fn commit(self, options: impl Into<CommitOptions>) -> Result<Self, GraphError> {
        self.graph.commit(&self.name, options)?;
        Ok(self)
    }

    /// Merge `from` into this branch. See [`Graph::merge`].
    pub fn merge(self, from: &str, options: impl Into<CommitOptions>) -> Result<Self, GraphError> {
        self.graph.merge(&self.name, from, options)?;
        Ok(self)
    }

    /// Create a new branch from this one and return its handle.
    pub fn branch(
        self,
        name: impl Into<String>,
        options: BranchOptions,
        commit: impl Into<CommitOptions>,
    ) -> Result<BranchMut<'g>, GraphError> {
        let options = options.from(self.name);
        self.graph.create_branch(name, options, commit)
    }

    /// See [`Graph::delete_branch`].
    pub fn delete(self, options: impl Into<CommitOptions>) -> Result<Self, GraphError> {
        self.graph.delete_branch(&self.name, options)?;
        Ok(self)
    }
}
