use crate::models::{ArtifactSet, Segment, NOISE_CLUSTER};

/// Classifies a user into their behavioral segment.
///
/// Total over all inputs: every login resolves to exactly one of the
/// three variants, computed freshly from the given snapshot. Zero
/// observations means a new user regardless of any stale assignment
/// row; with observations, the assignment decides between a noise and a
/// clustered segment. A user with observations but no assignment at all
/// (artifact drift between pipeline runs) degrades to the noise
/// segment, which still gets content-based suggestions.
pub fn resolve_segment(artifacts: &ArtifactSet, user_login: &str) -> Segment {
    let Some(seen) = artifacts.seen_species(user_login) else {
        tracing::debug!(user = %user_login, segment = "new", "Resolved segment");
        return Segment::NewUser;
    };
    let seen = seen.clone();

    let segment = match artifacts.cluster_of(user_login) {
        Some(NOISE_CLUSTER) => Segment::NoiseUser { seen },
        Some(cluster) => Segment::Clustered { cluster, seen },
        None => {
            tracing::warn!(
                user = %user_login,
                "User has observations but no cluster assignment, treating as noise segment"
            );
            Segment::NoiseUser { seen }
        }
    };

    tracing::debug!(
        user = %user_login,
        segment = segment.kind(),
        cluster = ?segment.cluster(),
        seen = segment.seen().map(|s| s.len()).unwrap_or(0),
        "Resolved segment"
    );

    segment
}
