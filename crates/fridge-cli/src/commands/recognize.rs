use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use fridge_core::{upload_latest, Config, FridgeSession, RecognitionClient};

#[derive(Args)]
pub struct RecognizeArgs {
    /// Photo of the fridge (JPEG)
    image: PathBuf,
    /// Print items as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: RecognizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = RecognitionClient::new(&config.recognition)?;

    let session = FridgeSession::new().shared();
    session.lock().await.capture_photo(args.image);
    upload_latest(&session, &client).await?;

    let views = session.lock().await.views(Utc::now());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else {
        super::print_views(&views);
    }
    Ok(())
}
