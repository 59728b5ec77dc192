//! Route directions, line slots and transfer slots.

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// One of the four travel directions a user configures.
///
/// Two are outbound (`go1`, `go2`) and two return (`back1`, `back2`).
/// Each outbound direction pairs with the return direction of the same
/// number.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::RouteDirection;
///
/// let go = RouteDirection::parse("go1").unwrap();
/// assert_eq!(go.opposite(), RouteDirection::Back1);
/// assert!(!go.is_return());
/// assert!(go.opposite().is_return());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteDirection {
    Go1,
    Go2,
    Back1,
    Back2,
}

impl RouteDirection {
    pub const ALL: [RouteDirection; 4] = [
        RouteDirection::Go1,
        RouteDirection::Go2,
        RouteDirection::Back1,
        RouteDirection::Back2,
    ];

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "go1" => Ok(RouteDirection::Go1),
            "go2" => Ok(RouteDirection::Go2),
            "back1" => Ok(RouteDirection::Back1),
            "back2" => Ok(RouteDirection::Back2),
            other => Err(DomainError::UnknownRoute(other.to_string())),
        }
    }

    /// The key prefix for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteDirection::Go1 => "go1",
            RouteDirection::Go2 => "go2",
            RouteDirection::Back1 => "back1",
            RouteDirection::Back2 => "back2",
        }
    }

    /// The direction travelled in reverse.
    pub fn opposite(&self) -> Self {
        match self {
            RouteDirection::Go1 => RouteDirection::Back1,
            RouteDirection::Go2 => RouteDirection::Back2,
            RouteDirection::Back1 => RouteDirection::Go1,
            RouteDirection::Back2 => RouteDirection::Go2,
        }
    }

    /// Return directions swap the departure point and destination labels.
    pub fn is_return(&self) -> bool {
        matches!(self, RouteDirection::Back1 | RouteDirection::Back2)
    }
}

impl fmt::Display for RouteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One of up to three lines configured on a route direction (0-2).
///
/// Keys use the 1-based [`LineSlot::number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineSlot(u8);

impl LineSlot {
    pub const ALL: [LineSlot; 3] = [LineSlot(0), LineSlot(1), LineSlot(2)];

    pub fn new(index: u8) -> Result<Self, DomainError> {
        if index > 2 {
            return Err(DomainError::LineSlot(index));
        }
        Ok(LineSlot(index))
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// The 1-based number used in keys.
    pub fn number(&self) -> u8 {
        self.0 + 1
    }
}

impl fmt::Display for LineSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A transfer leg between lines (0-3).
///
/// Slot 0 is the walk to the first line; slots 1-3 follow each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferSlot(u8);

impl TransferSlot {
    pub const ALL: [TransferSlot; 4] = [
        TransferSlot(0),
        TransferSlot(1),
        TransferSlot(2),
        TransferSlot(3),
    ];

    pub fn new(index: u8) -> Result<Self, DomainError> {
        if index > 3 {
            return Err(DomainError::TransferSlot(index));
        }
        Ok(TransferSlot(index))
    }

    pub fn index(&self) -> u8 {
        self.0
    }
}

/// Whether a line is a train line or a bus line.
///
/// Only rail entries carry a train type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineKind {
    #[default]
    Rail,
    Bus,
}

impl LineKind {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "rail" => Ok(LineKind::Rail),
            "bus" => Ok(LineKind::Bus),
            other => Err(DomainError::UnknownLineKind(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Rail => "rail",
            LineKind::Bus => "bus",
        }
    }

    pub fn is_rail(&self) -> bool {
        matches!(self, LineKind::Rail)
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
