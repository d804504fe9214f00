//! Terminal front end for the chat widget.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use school_chat_relay::widget::{ChatWidget, HttpTransport, Message, Origin, TYPING};

const DEFAULT_URL: &str = "http://localhost:3000/geminiChat";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let url = std::env::var("RELAY_CHAT_URL").unwrap_or_else(|_| DEFAULT_URL.to_owned());
    let mut widget = ChatWidget::new(HttpTransport::new(url));
    widget.open();

    for message in widget.transcript() {
        print_message(message);
    }
    println!("(Tip: Ask about admissions, timings, or fees. Ctrl-D to quit.)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        print!("{TYPING}\r");
        std::io::stdout().flush()?;

        match widget.submit(&line).await {
            Ok(reply) => {
                // Clear the typing line before printing the reply.
                print!("{}\r", " ".repeat(TYPING.chars().count() + 2));
                print_message(reply);
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    widget.close();
    Ok(())
}

fn print_message(message: &Message) {
    match message.origin {
        Origin::Bot => println!("bot> {}", message.text),
        Origin::User => println!("you> {}", message.text),
    }
}
