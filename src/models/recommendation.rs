use serde::Serialize;
use std::collections::HashSet;

use super::artifacts::ClusterId;

/// Behavioral segment of an observer.
///
/// Selects the ranking strategy and carries only what that strategy
/// needs: nothing for a first-time observer, the seen-species set for a
/// noise-segment observer, cluster plus seen set for a clustered one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// No observations on record
    NewUser,
    /// Observations exist but clustering labelled the user as noise (or
    /// never assigned them)
    NoiseUser { seen: HashSet<String> },
    /// Member of a valid behavioral cluster
    Clustered {
        cluster: ClusterId,
        seen: HashSet<String>,
    },
}

impl Segment {
    /// Short label for logs and the profile endpoint.
    pub fn kind(&self) -> &'static str {
        match self {
            Segment::NewUser => "new",
            Segment::NoiseUser { .. } => "noise",
            Segment::Clustered { .. } => "clustered",
        }
    }

    /// Cluster id for clustered users, `None` otherwise.
    pub fn cluster(&self) -> Option<ClusterId> {
        match self {
            Segment::Clustered { cluster, .. } => Some(*cluster),
            _ => None,
        }
    }

    /// Distinct species this user has already observed.
    pub fn seen(&self) -> Option<&HashSet<String>> {
        match self {
            Segment::NewUser => None,
            Segment::NoiseUser { seen } => Some(seen),
            Segment::Clustered { seen, .. } => Some(seen),
        }
    }
}

/// Output of one `recommend` call: a rationale message plus an ordered
/// list of species identifiers, at most the requested count.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub message: String,
    pub species: Vec<String>,
}
