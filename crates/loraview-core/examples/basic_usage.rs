//! Basic usage example - print the embedded metadata of one LoRA file

use loraview_core::{LoraApi, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "./example-loras".to_string());
    let identifier = args
        .next()
        .unwrap_or_else(|| "example.safetensors".to_string());

    println!("Initializing LoraApi with root: {}", root);
    let api = LoraApi::new(&root)?;

    let metadata = api.get_metadata(&identifier).await?;
    if metadata.is_empty() {
        println!("'{}' has an empty metadata block.", identifier);
    } else {
        println!("Found {} metadata entries:", metadata.len());
        for (key, value) in &metadata {
            println!("  - {}: {}", key, value);
        }
    }

    Ok(())
}
