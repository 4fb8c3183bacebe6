use std::path::PathBuf;

/// The sample `prompts/` directory shipped with this crate.
pub fn sample_prompts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("prompts")
}
