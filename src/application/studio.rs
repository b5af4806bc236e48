#[cfg(test)]
#[path = "studio_test.rs"]
mod tests;

use std::io::Write;
use std::str::FromStr;

use anyhow::Error;
use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::task;
use yansi::Paint;

use crate::application::output;
use crate::application::output::OutputFormat;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendBox;
use crate::domain::models::BrandError;
use crate::domain::models::Event;
use crate::domain::models::LogoSlot;
use crate::domain::models::Mission;
use crate::domain::models::RegenerateTarget;
use crate::domain::models::SlashCommand;
use crate::domain::services::Studio;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) [MISSION] - Generates a fresh identity for a mission, replacing the current one.
- /regenerate (/r, /regen) [primary|secondary|all] - Renders logos again from the current strategy.
- /show (/s) - Prints the current identity.
- /history - Prints the chat transcript.
- /help (/h) - Shows this help.
- /quit (/q, /exit) - Exits the studio.

Anything else is sent to the brand assistant.
    "#;

    return text.trim().to_string();
}

/// The message of a rejected input, `None` for every other failure.
pub fn validation_message(err: &Error) -> Option<String> {
    return err
        .downcast_ref::<BrandError>()
        .filter(|err| return err.is_validation())
        .map(|err| return err.to_string());
}

fn output_format() -> Result<OutputFormat> {
    return Ok(OutputFormat::from_str(&Config::get(ConfigKey::Output))?);
}

/// Prints progress labels to stderr until every sender is dropped.
fn spawn_progress_printer(mut rx: mpsc::UnboundedReceiver<Event>) -> task::JoinHandle<()> {
    return tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                Event::Progress(stage) => {
                    if let Some(label) = stage.label() {
                        eprintln!("{}", Paint::yellow(label));
                    }
                }
            }
        }
    });
}

pub async fn list_models(backend: BackendBox) -> Result<()> {
    backend.health_check().await?;
    let models = backend.list_models().await?;
    if models.is_empty() {
        println!("No models are available for this API key.");
        return Ok(());
    }

    println!("{}", models.join("\n"));
    return Ok(());
}

/// One-shot generation: prints the identity and exits.
pub async fn generate(backend: BackendBox, mission: &str) -> Result<()> {
    Mission::parse(mission)?;
    let format = output_format()?;
    backend.health_check().await?;

    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let printer = spawn_progress_printer(rx);

    let mut studio = Studio::new(backend);
    let res = studio.new_identity(mission, &tx).await;
    drop(tx);
    printer.await?;

    let identity = res?;
    println!("{}", output::render_identity(identity, format)?);

    return Ok(());
}

struct Repl {
    studio: Studio,
    backend: BackendBox,
    tx: mpsc::UnboundedSender<Event>,
    format: OutputFormat,
    healthy: bool,
}

impl Repl {
    async fn new_identity(&mut self, mission: &str) -> Result<()> {
        if let Err(err) = Mission::parse(mission) {
            println!("{}", Paint::yellow(err.to_string()));
            return Ok(());
        }
        if !self.healthy {
            if let Err(err) = self.backend.health_check().await {
                println!("{}", Paint::red(format!("{err:#}")));
                return Ok(());
            }
            self.healthy = true;
        }

        match self.studio.new_identity(mission, &self.tx).await {
            Ok(identity) => {
                println!("{}", output::render_identity(identity, self.format)?);
            }
            Err(err) => {
                println!("{}", Paint::red(err.to_string()));
                if self.studio.identity().is_some() {
                    println!("Keeping the previous identity.");
                }
            }
        }

        return Ok(());
    }

    async fn regenerate(&mut self, target: RegenerateTarget) {
        let slots = match target {
            RegenerateTarget::One(slot) => vec![slot],
            RegenerateTarget::All => vec![LogoSlot::Primary, LogoSlot::Secondary],
        };

        for slot in slots.iter() {
            eprintln!("{}", Paint::yellow(format!("Rendering {}...", slot.artifact())));
        }

        for (slot, res) in self.studio.regenerate(&slots).await {
            match res {
                Ok(()) => {
                    let uri = self
                        .studio
                        .identity()
                        .and_then(|identity| return identity.logo(slot));
                    println!(
                        "{} {}",
                        Paint::green(format!("Regenerated the {}:", slot.artifact())),
                        output::describe_image(uri)
                    );
                }
                Err(err) => println!("{}", Paint::red(err.to_string())),
            }
        }
    }

    fn show(&self) -> Result<()> {
        match self.studio.identity() {
            Some(identity) => println!("{}", output::render_identity(identity, self.format)?),
            None => println!("No identity yet. Start one with /new <mission>."),
        }

        return Ok(());
    }

    fn history(&self) {
        if let Some(instruction) = self.studio.chat().system_instruction() {
            tracing::debug!(instruction = instruction, "Chat seeded");
        }
        let messages = self.studio.chat().messages();
        if messages.is_empty() {
            println!("No messages yet.");
            return;
        }

        for message in messages {
            println!("{}", output::chat_line(message));
        }
    }

    /// Returns false once the user asked to leave.
    async fn handle_line(&mut self, line: &str) -> Result<bool> {
        if line.trim().is_empty() {
            return Ok(true);
        }

        if let Some(cmd) = SlashCommand::parse(line) {
            if cmd.is_quit() {
                return Ok(false);
            }
            if cmd.is_new() {
                self.new_identity(cmd.rest()).await?;
            } else if cmd.is_regenerate() {
                match cmd.regenerate_target() {
                    Some(target) => self.regenerate(target).await,
                    None => println!("Usage: /regenerate primary|secondary|all"),
                }
            } else if cmd.is_show() {
                self.show()?;
            } else if cmd.is_history() {
                self.history();
            } else if cmd.is_help() {
                println!("{}", help_text());
            }

            return Ok(true);
        }

        let reply = self.studio.send_chat(line.trim()).await;
        println!("{} {reply}", Paint::magenta("Assistant:").bold());

        return Ok(true);
    }
}

fn prompt() -> Result<()> {
    print!("{} ", Paint::cyan(">").bold());
    std::io::stdout().flush()?;
    return Ok(());
}

pub async fn start(backend: BackendBox, mission: Option<String>) -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let printer = spawn_progress_printer(rx);

    let mut repl = Repl {
        studio: Studio::new(backend.clone()),
        backend,
        tx,
        format: output_format()?,
        healthy: false,
    };

    println!(
        "{}",
        Paint::new("Lumina studio. Type /help for commands.").bold()
    );

    if let Some(mission) = mission {
        repl.new_identity(&mission).await?;
    } else {
        println!("Describe your company with /new <mission> to get started.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };

        if !repl.handle_line(&line).await? {
            break;
        }
    }

    drop(repl);
    printer.await?;

    return Ok(());
}
