#![forbid(unsafe_code)]
#![allow(clippy::print_stdout)]

//! Prints a fresh VAPID key pair as environment lines for `pwa-push-server`.

use clap::Parser;
use pwa_push_server::domain::vapid::generate_keys;

#[derive(Debug, Parser)]
#[command(version, about = "Generate a VAPID key pair for web push", long_about = None)]
struct Args {
    /// Contact URI to emit as VAPID_SUBJECT
    #[arg(long, default_value = "mailto:you@example.com")]
    subject: String,
}

fn main() {
    let args = Args::parse();
    let keys = generate_keys();

    println!("Copy these into your environment (e.g. .env or your host's settings):\n");
    println!("VAPID_PUBLIC_KEY={}", keys.public_key);
    println!("VAPID_PRIVATE_KEY={}", keys.private_key);
    println!("VAPID_SUBJECT={}", args.subject);
}
