mod sampler;

// Re-exports
pub use sampler::{animated_transform, sample_rotation, sample_translation};
