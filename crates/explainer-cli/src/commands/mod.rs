use anyhow::{Context, Result, bail};
use clap::Subcommand;
use explainer_core::analysis::project::language_for_extension;
use explainer_core::config::CONFIG_KEYS;
use explainer_core::{
    AnalysisResult, ConfigManager, ConfigValue, ExplainerEngine, ProjectSummarizer, classify,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const UNKNOWN_FILE_TYPE: &str = "Unknown";

#[derive(Subcommand)]
pub enum Commands {
    /// Explain a snippet and suggest improvements
    Explain {
        /// Language of the snippet (default: from --source, else Unknown)
        #[arg(long)]
        file_type: Option<String>,

        /// Project root used for the language summary
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// File the snippet was taken from, for import context
        #[arg(long)]
        source: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Snippet text, or "-" to read stdin
        code: Option<String>,
    },

    /// Print the project language summary
    Summary {
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Print the category of a snippet
    Classify {
        #[arg(long)]
        file_type: Option<String>,

        /// Snippet text, or "-" to read stdin
        code: Option<String>,
    },

    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print one value by dotted key
    Get { key: String },
    /// Change one value by dotted key
    Set { key: String, value: String },
    /// Store the API key in the settings file; an empty value clears it
    SetKey { key: String },
}

pub async fn run(command: Commands, manager: ConfigManager) -> Result<()> {
    match command {
        Commands::Explain {
            file_type,
            root,
            source,
            json,
            code,
        } => {
            let code = read_code(code)?;
            let file_type = resolve_file_type(file_type, source.as_deref());
            let engine = ExplainerEngine::new(Arc::new(manager)).await?;

            let result = match source {
                Some(ref source) => engine.analyze_in_file(&code, &file_type, &root, source).await,
                None => engine.analyze(&code, &file_type, &root).await,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_analysis(&result));
            }
        }
        Commands::Summary { root } => {
            let config = manager.get_config().await;
            let summarizer = ProjectSummarizer::new(&config.summary);
            let summary = tokio::task::spawn_blocking(move || summarizer.summarize(&root)).await?;
            println!("{}", summary);
        }
        Commands::Classify { file_type, code } => {
            let code = read_code(code)?;
            let file_type = file_type.unwrap_or_else(|| UNKNOWN_FILE_TYPE.to_string());
            println!("{}", classify(&code, &file_type));
        }
        Commands::Config(cmd) => handle_config_command(cmd, &manager).await?,
    }

    Ok(())
}

async fn handle_config_command(cmd: ConfigCommands, manager: &ConfigManager) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let mut config = manager.get_config().await;
            if config.credential.api_key.is_some() {
                config.credential.api_key = Some("[REDACTED]".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Get { key } => match manager.get_value(&key).await {
            Some(value) => println!("{}", value),
            None => bail!(
                "Unknown configuration key: {} (known keys: {})",
                key,
                CONFIG_KEYS.join(", ")
            ),
        },
        ConfigCommands::Set { key, value } => {
            manager
                .set_value(&key, ConfigValue::parse(&value))
                .await
                .with_context(|| format!("Cannot set {}", key))?;
            println!("✅ {} = {}", key, value);
            warn_if_not_persisted(manager);
        }
        ConfigCommands::SetKey { key } => {
            manager.store_api_key(&key).await?;
            if key.trim().is_empty() {
                println!("✅ API key cleared");
            } else {
                println!("✅ API key stored");
            }
            warn_if_not_persisted(manager);
        }
    }
    Ok(())
}

fn warn_if_not_persisted(manager: &ConfigManager) {
    if manager.config_path().is_none() {
        eprintln!("⚠️  No settings file location available; the change only lasts for this run");
    }
}

/// Snippet from the argument, or stdin for `-` or no argument
fn read_code(code: Option<String>) -> Result<String> {
    let code = match code {
        Some(code) if code != "-" => code,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read code from stdin")?;
            buffer
        }
    };

    if code.trim().is_empty() {
        bail!("No code given; pass it as an argument or on stdin");
    }
    Ok(code)
}

fn resolve_file_type(explicit: Option<String>, source: Option<&Path>) -> String {
    explicit
        .or_else(|| {
            source
                .and_then(|path| path.extension())
                .and_then(|ext| ext.to_str())
                .map(language_for_extension)
        })
        .unwrap_or_else(|| UNKNOWN_FILE_TYPE.to_string())
}

fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = format!("{}\n\n💡 Improvements:\n", result.explanation.trim_end());

    for (index, improvement) in result.improvements.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} (confidence {:.0}%)\n",
            index + 1,
            improvement.title,
            improvement.confidence * 100.0
        ));
        if !improvement.description.is_empty() {
            out.push_str(&format!("   {}\n", improvement.description));
        }
        out.push_str(&format!("```\n{}\n```\n", improvement.suggested_code.trim_end()));
    }

    out.push_str("\n🐛 Potential bugs:\n");
    for bug in &result.potential_bugs {
        out.push_str(&format!("• {}\n", bug));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use explainer_core::{Category, synthesize};

    #[test]
    fn test_file_type_resolution() {
        assert_eq!(resolve_file_type(Some("Go".to_string()), None), "Go");
        assert_eq!(resolve_file_type(None, Some(Path::new("src/App.java"))), "Java");
        assert_eq!(resolve_file_type(None, Some(Path::new("Makefile"))), "Unknown");
        assert_eq!(resolve_file_type(None, None), "Unknown");
    }

    #[test]
    fn test_code_from_argument() {
        assert_eq!(read_code(Some("SELECT 1".to_string())).unwrap(), "SELECT 1");
        assert!(read_code(Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_render_analysis() {
        let result = synthesize(Category::SqlQuery);
        let rendered = render_analysis(&result);

        assert!(rendered.starts_with(result.explanation.trim_end()));
        assert!(rendered.contains("💡 Improvements:\n1. "));
        assert!(rendered.contains("🐛 Potential bugs:\n• "));
        assert_eq!(rendered.matches("• ").count(), result.potential_bugs.len());
    }
}
