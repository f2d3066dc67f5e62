pub mod artifacts;
pub mod matrix;
pub mod observation;
pub mod recommendation;
pub mod season;

pub use artifacts::{ArtifactCounts, ArtifactSet, ClusterId, SpeciesInfo, SpeciesSeasonality, NOISE_CLUSTER};
pub use matrix::KeyedMatrix;
pub use observation::Observation;
pub use recommendation::{Recommendation, Segment};
pub use season::Season;
