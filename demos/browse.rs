//! Browse a CSE from the command line
//!
//! Connects to a CSE, expands the base resource and prints the cached tree.
//!
//! Run with: cargo run --example browse -- [host] [port] [cse-base]

use anyhow::{Context, Result};
use onem2m_console::store::NodeRef;
use onem2m_console::{ClientConfig, Console};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "localhost".to_string());
    let port: u16 = match args.next() {
        Some(port) => port.parse().context("port must be a number")?,
        None => 8282,
    };
    let cse_base = args.next().unwrap_or_else(|| "InCSE1".to_string());

    println!("oneM2M Browse Example");
    println!("=====================\n");

    let config = ClientConfig {
        enable_logging: true,
        ..ClientConfig::default()
    };
    let console = Console::new(config)?;

    console
        .connect(&host, port, &cse_base, false)
        .await
        .with_context(|| format!("retrieving {} from {}:{}", cse_base, host, port))?;
    console.expand(&cse_base).await?;

    let snapshot = console.tree().snapshot();
    println!("\n{} resources, {} links\n", snapshot.nodes.len(), snapshot.links.len());
    if let Some(root) = snapshot.root {
        print_node(&root, 0);
    }

    if let Some(descriptions) = console.describe(&cse_base) {
        println!("\nAttributes of {}:", cse_base);
        for (name, text) in descriptions.iter().take(8) {
            println!("  {:<6} {}", name, text);
        }
    }

    Ok(())
}

fn print_node(node: &NodeRef, depth: usize) {
    let node = node.read();
    let ty = node
        .resource_type
        .map(|ty| ty.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!(
        "{}{} ({}) [{}]",
        "  ".repeat(depth),
        node.name().unwrap_or(&node.id),
        node.id,
        ty
    );
    for child in node.children() {
        print_node(child, depth + 1);
    }
}
