use anyhow::Result;
use stockpath::cli::{actions, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, globals) = start()?;

    // Handle the action
    actions::handle(action, &globals).await?;

    Ok(())
}
