//! Interactive terminal chat surface for Tably
//!
//! Line-oriented presentation layer: slash commands manage uploads and the
//! analysis flag, anything else is routed through the chat orchestrator.

use std::path::Path;
use tably_core::{ChatOrchestrator, Result, SessionState, TableFormat, TablyError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const HELP_TEXT: &str = "\
Commands:
  /load <path.csv>        upload the primary CSV table
  /dict <path.csv|.xlsx>  upload the data dictionary
  /analysis on|off        toggle AI analysis
  /history                show the transcript
  /help                   show this help
  /quit                   exit

Anything else is sent to the model. Mention \"analyze\" or \"insight\" to
get a data analysis of the loaded table.";

/// Terminal surface settings
#[derive(Clone)]
pub struct TerminalConfig {
    /// Prompt string shown before each input line
    pub prompt: String,
    /// Rows shown in upload previews
    pub preview_rows: usize,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: "you> ".to_string(),
            preview_rows: 5,
        }
    }
}

/// One terminal session: a chat orchestrator plus the session it owns
pub struct TerminalAdaptor {
    config: TerminalConfig,
    orchestrator: ChatOrchestrator,
    session: SessionState,
}

impl TerminalAdaptor {
    /// Create an adaptor with a fresh session
    pub fn new(config: TerminalConfig, orchestrator: ChatOrchestrator) -> Self {
        Self {
            config,
            orchestrator,
            session: SessionState::new(),
        }
    }

    /// The session owned by this adaptor
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Mutable access for preloading tables before the loop starts
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// Preload the primary table from a file path
    pub fn load_table_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = std::fs::read(path.as_ref())?;
        self.orchestrator.upload_table(&mut self.session, &bytes)
    }

    /// Preload the dictionary from a file path, dispatching on extension
    pub fn load_dictionary_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = dictionary_format(path)?;
        let bytes = std::fs::read(path)?;
        self.orchestrator
            .upload_dictionary(&mut self.session, &bytes, format)
    }

    /// Process one input line and return the text to display.
    /// `None` means the user asked to quit.
    pub async fn handle_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return Some(String::new());
        }

        if let Some(rest) = line.strip_prefix('/') {
            let mut parts = rest.splitn(2, ' ');
            let command = parts.next().unwrap_or("");
            let arg = parts.next().map(str::trim).unwrap_or("");
            return self.handle_command(command, arg);
        }

        Some(self.orchestrator.handle_utterance(&mut self.session, line).await)
    }

    fn handle_command(&mut self, command: &str, arg: &str) -> Option<String> {
        match command {
            "quit" | "exit" => None,
            "help" => Some(HELP_TEXT.to_string()),
            "load" => Some(match self.load_table_file(arg) {
                Ok(()) => {
                    let table = self.session.table().expect("table was just set");
                    format!(
                        "✓ CSV file loaded ({} rows). Preview:\n{}",
                        table.n_rows(),
                        table.head(self.config.preview_rows)
                    )
                }
                Err(e) => format!("Error reading CSV: {}", display_message(&e)),
            }),
            "dict" => Some(match self.load_dictionary_file(arg) {
                Ok(()) => {
                    let dict = self.session.dictionary().expect("dictionary was just set");
                    format!(
                        "✓ Data dictionary loaded ({} rows). Preview:\n{}",
                        dict.n_rows(),
                        dict.head(self.config.preview_rows)
                    )
                }
                Err(e) => format!("Error reading Data Dictionary: {}", display_message(&e)),
            }),
            "analysis" => match arg {
                "on" => {
                    self.session.set_analysis_enabled(true);
                    Some("✓ AI analysis enabled".to_string())
                }
                "off" => {
                    self.session.set_analysis_enabled(false);
                    Some("✓ AI analysis disabled".to_string())
                }
                _ => Some("Usage: /analysis on|off".to_string()),
            },
            "history" => {
                let mut out = String::new();
                for turn in self.session.transcript() {
                    out.push_str(&format!("[{}] {}\n", turn.role, turn.text));
                }
                if out.is_empty() {
                    out.push_str("(empty transcript)");
                }
                Some(out)
            }
            other => Some(format!("Unknown command '/{}'. Try /help", other)),
        }
    }

    /// Read lines from stdin until EOF or /quit, printing replies to stdout
    pub async fn run(&mut self) -> Result<()> {
        info!("[{}] terminal session started", self.session.id());
        println!("🤖 Chat with your data. Type /help for commands.");

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        print_prompt(&self.config.prompt);
        while let Some(line) = lines.next_line().await.map_err(TablyError::Io)? {
            match self.handle_line(&line).await {
                Some(output) => {
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                }
                None => break,
            }
            print_prompt(&self.config.prompt);
        }

        info!("[{}] terminal session ended", self.session.id());
        Ok(())
    }
}

fn print_prompt(prompt: &str) {
    use std::io::Write;
    print!("{}", prompt);
    let _ = std::io::stdout().flush();
}

/// Strip the error-kind prefix for user-facing upload messages
fn display_message(e: &TablyError) -> String {
    match e {
        TablyError::Parse(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Select the dictionary parser from the file extension. Only `.csv` and
/// `.xlsx` are accepted on this path.
pub fn dictionary_format(path: &Path) -> Result<TableFormat> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => Ok(TableFormat::Csv),
        Some("xlsx") => Ok(TableFormat::Xlsx),
        other => Err(TablyError::parse(format!(
            "unsupported dictionary format: {:?} (expected .csv or .xlsx)",
            other.unwrap_or("none")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tably_core::{GatewayState, GATEWAY_UNAVAILABLE_NOTICE};

    fn adaptor() -> TerminalAdaptor {
        TerminalAdaptor::new(
            TerminalConfig::default(),
            ChatOrchestrator::new(GatewayState::disabled("test")),
        )
    }

    fn write_temp(contents: &[u8], suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_dictionary_format_dispatch() {
        assert_eq!(
            dictionary_format(Path::new("dict.csv")).unwrap(),
            TableFormat::Csv
        );
        assert_eq!(
            dictionary_format(Path::new("DICT.XLSX")).unwrap(),
            TableFormat::Xlsx
        );
        assert!(dictionary_format(Path::new("dict.pdf")).is_err());
        assert!(dictionary_format(Path::new("dict")).is_err());
    }

    #[tokio::test]
    async fn test_load_command_previews_table() {
        let file = write_temp(b"a,b\n1,2\n3,4\n", ".csv");
        let mut adaptor = adaptor();

        let output = adaptor
            .handle_line(&format!("/load {}", file.path().display()))
            .await
            .unwrap();
        assert!(output.contains("CSV file loaded (2 rows)"));
        assert!(output.contains('a'));
        assert_eq!(adaptor.session().table().unwrap().n_cols(), 2);
    }

    #[tokio::test]
    async fn test_bad_upload_reports_and_continues() {
        let file = write_temp(b"a,b\n1\n", ".csv");
        let mut adaptor = adaptor();

        let output = adaptor
            .handle_line(&format!("/load {}", file.path().display()))
            .await
            .unwrap();
        assert!(output.starts_with("Error reading CSV:"));
        assert!(adaptor.session().table().is_none());

        // session still chats (gateway disabled -> fixed notice)
        let reply = adaptor.handle_line("hello").await.unwrap();
        assert_eq!(reply, GATEWAY_UNAVAILABLE_NOTICE);
    }

    #[tokio::test]
    async fn test_analysis_toggle_and_quit() {
        let mut adaptor = adaptor();
        assert!(adaptor.session().analysis_enabled());

        adaptor.handle_line("/analysis off").await.unwrap();
        assert!(!adaptor.session().analysis_enabled());

        adaptor.handle_line("/analysis on").await.unwrap();
        assert!(adaptor.session().analysis_enabled());

        assert!(adaptor.handle_line("/quit").await.is_none());
    }

    #[tokio::test]
    async fn test_history_lists_turns() {
        let mut adaptor = adaptor();
        adaptor.handle_line("hello").await.unwrap();
        let history = adaptor.handle_line("/history").await.unwrap();
        assert!(history.contains("[user] hello"));
        assert!(history.contains("[assistant]"));
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut adaptor = adaptor();
        let output = adaptor.handle_line("/frobnicate").await.unwrap();
        assert!(output.contains("Unknown command"));
    }
}
