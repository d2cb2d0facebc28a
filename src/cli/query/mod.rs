//! Query command - answer one question and print it

use clap::Args;

use crate::config::AppConfig;

#[derive(Args, Clone, Debug)]
pub struct QueryArgs {
    /// The question; several words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

impl QueryArgs {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

pub async fn run(config: &AppConfig, args: QueryArgs) -> anyhow::Result<()> {
    super::require_persistent_store(config)?;
    let state = crate::create_app_state(config).await?;
    let answer = state.answer(&args.text()).await?;

    println!("{}", answer);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_rejected() {
        let args = QueryArgs {
            words: vec!["hvad".to_string(), "er".to_string(), "RAG?".to_string()],
        };
        assert_eq!(args.text(), "hvad er RAG?");

        let err = run(&AppConfig::default(), args).await.unwrap_err();
        assert!(err.to_string().contains("in_memory"));
    }
}
