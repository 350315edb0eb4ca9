//! Werewolf table CLI entry point

#[tokio::main]
async fn main() {
    if let Err(err) = werewolf_cli::run().await {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
