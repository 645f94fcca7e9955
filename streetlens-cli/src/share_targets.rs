//! Share targets available in a terminal.

use async_trait::async_trait;
use colored::Colorize;
use streetlens_core::{Result, SharePayload, ShareTarget};

/// The terminal's share affordance: print the payload for the user to pass
/// on. Always available.
pub struct ConsoleShareTarget;

#[async_trait]
impl ShareTarget for ConsoleShareTarget {
    fn available(&self) -> bool {
        true
    }

    async fn share(&self, payload: &SharePayload) -> Result<()> {
        println!();
        println!("{}", payload.title.bold());
        println!("{}", payload.text);
        println!("{}", payload.url.underline());
        Ok(())
    }
}
