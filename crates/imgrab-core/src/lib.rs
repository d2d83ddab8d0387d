//! Core engine for imgrab: downloads a batch of images from a single
//! endpoint with a bounded number of concurrent transfers, streaming each
//! response body to disk and naming the file after the response
//! `Content-Type`.

pub mod config;
pub mod control;
pub mod driver;
pub mod fetch;
pub mod logging;
pub mod outdir;
pub mod progress;
