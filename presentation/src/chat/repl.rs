//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use parley_application::ChatUseCase;
use parley_domain::{ChatEvent, HumanDecision};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::io::Write;
use tokio::sync::mpsc;
use tracing::error;

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: ChatUseCase,
    model_name: String,
    stream: bool,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(use_case: ChatUseCase, model_name: impl Into<String>) -> Self {
        Self {
            use_case,
            model_name: model_name.into(),
            stream: false,
        }
    }

    /// Stream responses token by token instead of printing them whole
    pub fn with_streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("parley").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_message(line, &mut rl).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("parley - chat with {} (tools enabled)", self.model_name);
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /tools    - List available tools");
        println!("  /reset    - Clear the conversation");
        println!("  /quit     - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /tools           - List available tools");
                println!("  /reset           - Clear the conversation");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/tools" => {
                println!();
                println!("Available tools:");
                let mut tools: Vec<_> = self.use_case.tool_catalog();
                tools.sort_by(|a, b| a.name.cmp(&b.name));
                for tool in tools {
                    println!("{}", ConsoleFormatter::format_tool_line(tool));
                }
                println!();
                false
            }
            "/reset" => {
                self.use_case.reset();
                println!("Conversation cleared.");
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_message(&mut self, text: &str, rl: &mut DefaultEditor) {
        println!();

        if self.stream {
            self.process_streaming(text).await;
            return;
        }

        match self.use_case.send_message(text).await {
            Ok(outcome) => {
                if outcome.needs_approval {
                    self.resolve_approvals(rl).await;
                } else {
                    println!("{}", ConsoleFormatter::format_response(&outcome.response));
                }
            }
            Err(e) => {
                error!(error = %e, "Chat request failed");
                eprintln!("Error: {}", e);
            }
        }
        println!();
    }

    /// Prompt for each pending call in turn until the loop settles.
    async fn resolve_approvals(&mut self, rl: &mut DefaultEditor) {
        while let Some(pending) = self.use_case.pending_tool_call() {
            let tool_name = pending.tool_name().to_string();
            print!("{}", ConsoleFormatter::format_pending(pending));

            let approved = matches!(
                rl.readline("Approve? [y/N] "),
                Ok(answer) if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
            );
            let decision = if approved {
                HumanDecision::Approve
            } else {
                HumanDecision::Reject
            };

            match self.use_case.continue_after_approval(decision).await {
                Ok(_) if self.use_case.pending_tool_call().is_some() => {
                    // Another tool wants approval; loop again.
                }
                Ok(response) => {
                    if decision == HumanDecision::Reject {
                        println!("{}", ConsoleFormatter::format_rejection(&tool_name));
                    } else {
                        println!("{}", ConsoleFormatter::format_response(&response));
                    }
                }
                Err(e) => {
                    error!(error = %e, "Continuation failed");
                    eprintln!("Error: {}", e);
                    return;
                }
            }
        }
    }

    async fn process_streaming(&mut self, text: &str) {
        let (tx, mut rx) = mpsc::channel::<ChatEvent>(64);

        let printer = tokio::spawn(async move {
            let mut stdout = std::io::stdout();
            while let Some(event) = rx.recv().await {
                match event {
                    ChatEvent::TextDelta(delta) => {
                        print!("{}", delta);
                        let _ = stdout.flush();
                    }
                    ChatEvent::ToolStart { name } => {
                        println!("\n{}", ConsoleFormatter::format_tool_start(&name));
                    }
                    ChatEvent::ToolEnd { name } => {
                        println!("{}", ConsoleFormatter::format_tool_end(&name));
                    }
                    ChatEvent::Error(message) => {
                        eprintln!("\nStream error: {}", message);
                    }
                }
            }
        });

        let result = self.use_case.send_message_stream(text, tx).await;
        let _ = printer.await;

        match result {
            Ok(()) => println!(),
            Err(e) => eprintln!("\nError: {}", e),
        }
        println!();
    }
}
