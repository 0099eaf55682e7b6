//! Starter Configuration Generator for Tably
//!
//! Writes a starter .env with the Gemini settings the chat UI reads, and
//! optionally a cosmetic theme file for the presentation layer.

use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output file path for the .env file
    #[arg(short, long, default_value = ".env")]
    output: PathBuf,

    /// Also write a cosmetic theme file
    #[arg(long)]
    theme: bool,

    /// Theme file path (only used with --theme)
    #[arg(long, default_value = "theme.toml")]
    theme_output: PathBuf,

    /// Force overwrite if files exist
    #[arg(short, long)]
    force: bool,
}

#[derive(Serialize)]
struct ThemeFile {
    theme: Theme,
}

#[derive(Serialize)]
struct Theme {
    base: String,
    #[serde(rename = "primaryColor")]
    primary_color: String,
    #[serde(rename = "backgroundColor")]
    background_color: String,
    #[serde(rename = "secondaryBackgroundColor")]
    secondary_background_color: String,
    #[serde(rename = "textColor")]
    text_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            base: "light".to_string(),
            primary_color: "#1e3a8a".to_string(),
            background_color: "#ffffff".to_string(),
            secondary_background_color: "#f0f0f0".to_string(),
            text_color: "#000000".to_string(),
        }
    }
}

fn generate_env_content() -> String {
    format!(
        "# ========================================\n\
         # Tably - Environment Configuration\n\
         # ========================================\n\
         # Generated: {}\n\
         #\n\
         # Never commit this file to version control once keys are filled in.\n\
         \n\
         # Gemini Configuration\n\
         GEMINI_API_KEY=\n\
         GEMINI_MODEL=gemini-pro\n\
         \n\
         # Logging Configuration\n\
         RUST_LOG=info,tably_core=debug\n\
         TABLY_LOG_LEVEL=info\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Refuse to clobber an existing file unless --force was given
fn check_overwrite(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "File {:?} already exists! Use --force to overwrite",
            path
        ));
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(msg) = check_overwrite(&cli.output, cli.force) {
        eprintln!("❌ Error: {}", msg);
        std::process::exit(1);
    }
    if cli.theme {
        if let Err(msg) = check_overwrite(&cli.theme_output, cli.force) {
            eprintln!("❌ Error: {}", msg);
            std::process::exit(1);
        }
    }

    println!("📄 Tably Configuration Generator");
    println!();

    let content = generate_env_content();
    match fs::write(&cli.output, content) {
        Ok(_) => println!("✓ Configuration written to: {:?}", cli.output),
        Err(e) => {
            eprintln!("❌ Failed to write file: {}", e);
            std::process::exit(1);
        }
    }

    if cli.theme {
        let theme = ThemeFile {
            theme: Theme::default(),
        };
        let rendered = toml::to_string_pretty(&theme).expect("theme serializes");
        match fs::write(&cli.theme_output, rendered) {
            Ok(_) => println!("✓ Theme written to: {:?}", cli.theme_output),
            Err(e) => {
                eprintln!("❌ Failed to write theme file: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!();
    println!("📋 Next Steps:");
    println!("   1. Edit {:?} and add your GEMINI_API_KEY", cli.output);
    println!("   2. Run 'cargo run --bin run-chat-ui -- --csv your_data.csv'");
    println!("   3. Type /help in the chat for upload and analysis commands");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_content_has_required_keys() {
        let content = generate_env_content();
        assert!(content.contains("GEMINI_API_KEY="));
        assert!(content.contains("GEMINI_MODEL=gemini-pro"));
        assert!(content.contains("RUST_LOG="));
    }

    #[test]
    fn test_check_overwrite_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "GEMINI_API_KEY=\n").unwrap();

        let err = check_overwrite(&path, false).unwrap_err();
        assert!(err.contains("--force"));
        assert!(check_overwrite(&path, true).is_ok());
    }

    #[test]
    fn test_check_overwrite_allows_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.env");
        assert!(check_overwrite(&path, false).is_ok());
    }

    #[test]
    fn test_theme_serializes_with_theme_table() {
        let rendered = toml::to_string_pretty(&ThemeFile {
            theme: Theme::default(),
        })
        .unwrap();
        assert!(rendered.contains("[theme]"));
        assert!(rendered.contains("base = \"light\""));
        assert!(rendered.contains("primaryColor = \"#1e3a8a\""));
    }
}
