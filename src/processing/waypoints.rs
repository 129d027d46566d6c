//! Waypoint table loading
//!
//! A waypoint file is a flat table: one waypoint per line, each line holding
//! exactly seven whitespace-separated numbers `x y z qx qy qz qw`. There is no
//! header and no comment syntax. Blank lines are ignored.

use crate::core::Waypoint;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Number of values on every waypoint line
pub const WAYPOINT_FIELDS: usize = 7;

/// Why a single waypoint line was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedReason {
    #[error("expected 7 values, found {0}")]
    FieldCount(usize),
    #[error("'{token}' is not a number")]
    NotANumber { token: String },
}

/// Errors raised while loading a waypoint table
#[derive(Debug, Error)]
pub enum WaypointError {
    /// A line does not hold exactly seven real values
    #[error("malformed waypoint on line {line}: {reason}")]
    Malformed { line: usize, reason: MalformedReason },
    /// The source held no waypoints at all
    #[error("waypoint table is empty")]
    Empty,
    /// The source could not be read
    #[error("failed to read waypoints from {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },
}

/// Ordered, immutable list of waypoints. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointTable {
    waypoints: Vec<Waypoint>,
}

impl WaypointTable {
    /// Build a table from already parsed waypoints
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, WaypointError> {
        if waypoints.is_empty() {
            return Err(WaypointError::Empty);
        }
        Ok(Self { waypoints })
    }

    /// Load a table from a waypoint file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WaypointError> {
        let origin = path.as_ref().display().to_string();
        let file = File::open(&path).map_err(|source| WaypointError::Io {
            origin: origin.clone(),
            source,
        })?;
        Self::load_from(BufReader::new(file), &origin)
    }

    /// Load a table from any buffered reader
    pub fn load<R: BufRead>(reader: R) -> Result<Self, WaypointError> {
        Self::load_from(reader, "waypoint source")
    }

    /// Parse a table held in memory
    pub fn parse(text: &str) -> Result<Self, WaypointError> {
        Self::load(text.as_bytes())
    }

    fn load_from<R: BufRead>(reader: R, origin: &str) -> Result<Self, WaypointError> {
        let mut waypoints = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| WaypointError::Io {
                origin: origin.to_string(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let waypoint = parse_row(&line).map_err(|reason| WaypointError::Malformed {
                line: index + 1,
                reason,
            })?;
            waypoints.push(waypoint);
        }

        Self::new(waypoints)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn last(&self) -> &Waypoint {
        &self.waypoints[self.last_index()]
    }

    /// Index of the final waypoint
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }
}

fn parse_row(line: &str) -> Result<Waypoint, MalformedReason> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != WAYPOINT_FIELDS {
        return Err(MalformedReason::FieldCount(tokens.len()));
    }

    let mut row = [0.0; WAYPOINT_FIELDS];
    for (slot, token) in row.iter_mut().zip(&tokens) {
        *slot = token.parse::<f64>().map_err(|_| MalformedReason::NotANumber {
            token: token.to_string(),
        })?;
    }

    Ok(Waypoint::from_row(row))
}
