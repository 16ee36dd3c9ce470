//! # Contacts CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/contactsapp/`: core library with the model, CSV codec, storage backends
//!   and the hydrating contact store.
//! - `crates/contacts/`: this CLI, which depends on `contactsapp`.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/contacts/src/cli/)                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Store wiring + dispatch (commands.rs)                    │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store Layer (crates/contactsapp/src/contact_store.rs)      │
//! │  - In-memory list, hydration, write-through persistence     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (crates/contactsapp/src/store/)              │
//! │  - CSV adapter over a key/value backend (file or memory)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the CLI layer is UI agnostic. The CLI owns argument
//! parsing, logging setup, rendering, and exit codes.

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
