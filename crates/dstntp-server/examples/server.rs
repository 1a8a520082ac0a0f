// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Run the server with the default configuration.
//!
//! ```sh
//! cargo run --example server
//! ```
//!
//! Then query it with any SNTP client, e.g. `ntpdate -q -p 1 127.0.0.1`
//! against port 124.

use dst_server::server::NtpServer;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let server = NtpServer::builder().build().await?;
    println!("listening on {}", server.local_addr()?);
    server.run().await
}
