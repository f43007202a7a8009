//! Issue a GET and print what was requested and how the server answered.
//!
//! Usage: `cargo run -p requests --example get -- [URL]`
//! (start `mock-server` first to use the default URL).

use requests::Client;

fn main() -> Result<(), requests::Error> {
    env_logger::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:3000/echo".to_string());

    let client = Client::new();
    let resp = client.get(&url, [])?;
    println!(
        "{} {} {}",
        resp.request().method,
        resp.request().url,
        resp.status().code
    );
    Ok(())
}
