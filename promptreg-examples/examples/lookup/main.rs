use anyhow::Result;
use promptreg::filler::MapFiller;
use promptreg::registry::{PromptRegistry, RegistryError};
use promptreg_examples::sample_prompts_dir;

fn main() -> Result<()> {
    let registry = PromptRegistry::new(sample_prompts_dir(), "registry.yaml")?;

    for id in registry.available_prompts() {
        match registry.get_prompt(&id) {
            Ok(info) => println!("{} ({}): {} [model: {}]", info.id, info.version, info.description,
                                 info.model.as_deref().unwrap_or("-")),
            Err(error) => println!("{}: {}", id, error),
        }
    }

    if let Err(error @ RegistryError::PromptNotFound { .. }) = registry.get_prompt("pull-request-creator") {
        println!("\n{}", error);
    }

    let variables = MapFiller::new()
        .with("changes_summary", "Implementation of cache system to improve performance")
        .with("files_changed", "src/cache.rs, tests/cache.rs, README.md")
        .with("issue_number", "42")
        .with("branch_name", "feature/add-cache-system")
        .with("breaking_changes", "No")
        .with("testing_done", "Unit tests added with 95% coverage");
    let mut prompt = registry.load_template("pull_request_creator")?.construct_prompt();
    prompt.apply(&variables)?;
    println!("\n{}", prompt.complete()?);
    Ok(())
}
