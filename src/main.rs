// src/main.rs

use std::io::{self, Write};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::Parser;
use tracing::Level;

use mathtutor::client::GeminiClient;
use mathtutor::controller::ChatController;
use mathtutor::settings;

#[derive(Parser, Debug)]
#[command(name = "mathtutor", version, about = "Chat with an AI math solver in the terminal")]
struct Cli {
    /// Override the model id from settings
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::WARN).init();

    let cli = Cli::parse();

    let mut app_settings = settings::load_settings()?;
    if let Some(model) = cli.model {
        app_settings.model = model;
    }

    let api_key = std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?;
    let client = GeminiClient::from_settings(api_key, &app_settings);
    let mut controller = ChatController::new(client);

    if let Some(welcome) = controller.messages().last() {
        println!("{}", welcome.text);
    }
    println!("(type a problem, /image <path> to attach a photo, /quit to exit)");

    let mut staged_image: Option<String> = None;
    let mut input = String::new();

    loop {
        if staged_image.is_some() {
            print!("[image attached] > ");
        } else {
            print!("> ");
        }
        io::stdout().flush()?;

        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }
        let line = input.trim();

        if line == "/quit" || line == "/exit" {
            break;
        }
        if let Some(path) = line.strip_prefix("/image ") {
            match read_image_as_data_url(Path::new(path.trim())) {
                Ok(data_url) => {
                    staged_image = Some(data_url);
                    println!("image staged for the next message");
                }
                Err(e) => println!("could not read image: {e:#}"),
            }
            continue;
        }
        if line.is_empty() && staged_image.is_none() {
            continue;
        }

        println!("thinking...");
        controller.send(line, staged_image.take()).await;

        let state = controller.state();
        if let Some(err) = &state.error {
            println!("\n{err}\n");
        } else if let Some(reply) = state.messages.last() {
            println!("\n{}\n", reply.text);
        }
    }

    Ok(())
}

/// Read a file into a `data:<mime>;base64,<payload>` string.
fn read_image_as_data_url(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    ensure!(
        mime.type_() == mime_guess::mime::IMAGE,
        "{} does not look like an image",
        path.display()
    );
    Ok(format!("data:{};base64,{}", mime.essence_str(), BASE64.encode(bytes)))
}
