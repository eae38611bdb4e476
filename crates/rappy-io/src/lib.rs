pub mod artifacts;

pub use artifacts::{DirArtifactSink, NullArtifactSink};
