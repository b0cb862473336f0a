//! Line-based stand-in for the desktop GUI: sends the same connect / toggle
//! requests and prints what the bridge reports back.

use std::collections::BTreeSet;
use std::io::{BufRead, BufReader, Write};
use std::thread;

use tokio::sync::mpsc;

use owobridge_core::OwoSuit;
use owobridge_core::models::{ControlCommand, SuitEvent};

/// What the console loop should do after a line.
#[derive(Debug, PartialEq)]
pub enum ConsoleOutcome {
    Continue(String),
    Quit,
}

pub struct ConsoleModule {
    suit: OwoSuit,
    commands: mpsc::Sender<ControlCommand>,
}

impl ConsoleModule {
    pub fn new(suit: OwoSuit, commands: mpsc::Sender<ControlCommand>) -> Self {
        Self { suit, commands }
    }

    pub fn execute_command(&self, line: &str) -> ConsoleOutcome {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(cmd) = parts.first() else {
            return ConsoleOutcome::Continue(String::new());
        };

        match *cmd {
            "help" => ConsoleOutcome::Continue(
                [
                    "Commands:",
                    "  help     - show this help",
                    "  connect  - (re)connect to the suit",
                    "  toggle   - pause / resume interactions",
                    "  status   - connection and active muscles",
                    "  quit     - shut the bridge down",
                ]
                .join("\n"),
            ),
            "connect" => self.request(ControlCommand::Connect, "Connecting..."),
            "toggle" => {
                let next = if self.suit.state().is_paused() { "Resuming" } else { "Pausing" };
                self.request(ControlCommand::ToggleInteractions, &format!("{next} interactions..."))
            }
            "status" => ConsoleOutcome::Continue(self.status_line()),
            "quit" | "exit" => {
                self.suit.shutdown();
                ConsoleOutcome::Quit
            }
            other => ConsoleOutcome::Continue(format!("Unknown command '{other}'. Type 'help'.")),
        }
    }

    fn request(&self, cmd: ControlCommand, ok_msg: &str) -> ConsoleOutcome {
        match self.commands.try_send(cmd) {
            Ok(()) => ConsoleOutcome::Continue(ok_msg.to_string()),
            Err(e) => ConsoleOutcome::Continue(format!("Could not send {:?}: {e}", cmd)),
        }
    }

    fn status_line(&self) -> String {
        let state = self.suit.state();
        let connection = if state.is_connecting() {
            "connecting"
        } else if state.has_connected() {
            "connected"
        } else {
            "disconnected"
        };
        let active: Vec<String> = state.snapshot().iter().map(|m| m.to_string()).collect();
        format!(
            "suit={connection} paused={} active=[{}]",
            state.is_paused(),
            active.join(", ")
        )
    }

    /// Read stdin on a plain thread until `quit` or EOF.
    pub fn spawn_console_thread(self) {
        thread::spawn(move || {
            println!("Console enabled. Type 'help' for commands.");
            let mut reader = BufReader::new(std::io::stdin());
            loop {
                print!("owo> ");
                let _ = std::io::stdout().flush();

                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(_) => {
                        eprintln!("Error reading from stdin.");
                        break;
                    }
                }
                match self.execute_command(line.trim()) {
                    ConsoleOutcome::Continue(msg) if msg.is_empty() => {}
                    ConsoleOutcome::Continue(msg) => println!("{msg}"),
                    ConsoleOutcome::Quit => {
                        println!("Shutting down...");
                        break;
                    }
                }
            }
        });
    }

    /// Print connection changes, and each muscle once per touch.
    pub async fn spawn_event_printer(&self) {
        let mut rx = self.suit.event_bus().subscribe(None).await;
        tokio::spawn(async move {
            let mut touching: BTreeSet<String> = BTreeSet::new();
            while let Some(event) = rx.recv().await {
                match event {
                    SuitEvent::ConnectionStateChanged(state) => println!("[suit] {}", state.token()),
                    SuitEvent::ActiveMuscleUpdate { parameter } => {
                        if touching.insert(parameter.clone()) {
                            println!("[touch] {parameter}");
                        }
                    }
                    SuitEvent::ActiveMuscleReset => {
                        if !touching.is_empty() {
                            touching.clear();
                            println!("[touch] clear");
                        }
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use owobridge_core::AppConfig;
    use owobridge_core::models::Muscle;
    use owobridge_core::suit::SimulatedSuit;

    fn console() -> (ConsoleModule, mpsc::Receiver<ControlCommand>) {
        let suit = OwoSuit::new(AppConfig::default(), Arc::new(SimulatedSuit::new()));
        let (tx, rx) = mpsc::channel(4);
        (ConsoleModule::new(suit, tx), rx)
    }

    #[test]
    fn connect_and_toggle_become_commands() {
        let (c, mut rx) = console();
        assert!(matches!(c.execute_command("connect"), ConsoleOutcome::Continue(_)));
        assert!(matches!(c.execute_command("toggle"), ConsoleOutcome::Continue(_)));
        assert_eq!(rx.try_recv().unwrap(), ControlCommand::Connect);
        assert_eq!(rx.try_recv().unwrap(), ControlCommand::ToggleInteractions);
    }

    #[test]
    fn status_lists_active_muscles() {
        let (c, _rx) = console();
        c.suit.state().enter(Muscle::ArmL);
        match c.execute_command("status") {
            ConsoleOutcome::Continue(s) => {
                assert!(s.contains("disconnected"));
                assert!(s.contains("Arm_L"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn quit_shuts_the_bus_down() {
        let (c, _rx) = console();
        assert_eq!(c.execute_command("quit"), ConsoleOutcome::Quit);
        assert!(c.suit.event_bus().is_shutdown());
    }

    #[test]
    fn blank_and_unknown_lines() {
        let (c, rx) = console();
        assert_eq!(c.execute_command("   "), ConsoleOutcome::Continue(String::new()));
        assert!(matches!(c.execute_command("dance"), ConsoleOutcome::Continue(s) if s.contains("Unknown")));
        drop(rx);
    }
}
