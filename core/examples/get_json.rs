//! Fetch a JSON document, then POST it back and decode the reply.
//!
//! Usage: `cargo run -p requests --example get_json -- [URL]`
//! (start `mock-server` first to use the default URL).

use std::io::Cursor;

use requests::{with_header, Client};
use serde_json::Value;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:3000/echo".to_string());

    let client = Client::new();
    let mut resp = client.get(&url, [])?;
    let document: Value = resp.decode_json()?;
    println!("{document:#}");

    let body = serde_json::to_vec(&document)?;
    let mut resp = client.post(
        &url,
        Cursor::new(body),
        [with_header("Content-Type", "application/json")],
    )?;
    let reply: Value = resp.decode_json()?;
    println!("{reply}");
    Ok(())
}
