//! Example writer and reader threads sharing one device pair.
//!
//! Run with: `RUST_LOG=debug cargo run --example loopback`

use relaybuf::device::{DEFAULT_INBOUND_NAME, DEFAULT_OUTBOUND_NAME};
use relaybuf::prelude::*;
use std::time::Duration;

const MESSAGES: usize = 32;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let device = DeviceBuilder::new()
        .config(
            BufferConfig::new()
                .with_capacity(64)
                .with_lock_timeout(Duration::from_millis(50)),
        )
        .build()?;

    println!("Installed {:?}", device);

    let received = std::thread::scope(|s| -> Result<Vec<u8>, DeviceError> {
        let writer = s.spawn(|| -> Result<usize, DeviceError> {
            let mut handle = device.open(DEFAULT_INBOUND_NAME)?;
            let mut dropped = 0;
            for i in 0..MESSAGES {
                let line = format!("message {:02}\n", i);
                let written = loop {
                    match handle.write(line.as_bytes()) {
                        Ok(written) => break written,
                        Err(e) if e.is_busy() => {
                            std::thread::sleep(Duration::from_millis(1));
                        }
                        Err(e) => return Err(e),
                    }
                };
                dropped += line.len() - written.len;
                std::thread::sleep(Duration::from_millis(1));
            }
            Ok(dropped)
        });

        let mut handle = device.open(DEFAULT_OUTBOUND_NAME)?;
        let mut received = Vec::new();
        let mut buf = [0u8; 24];
        while !writer.is_finished() || device.buffer().len_hint() > 0 {
            match handle.read(&mut buf) {
                Ok(read) => received.extend_from_slice(&buf[..read.len]),
                Err(e) if e.is_busy() => {}
                Err(e) => return Err(e),
            }
            std::thread::sleep(Duration::from_micros(500));
        }

        let dropped = writer.join().expect("writer thread panicked")?;
        println!("Writer dropped {} bytes to truncation", dropped);
        Ok(received)
    })?;

    println!("Reader received {} bytes:", received.len());
    print!("{}", String::from_utf8_lossy(&received));
    println!("Buffer stats: {:?}", device.buffer().stats().snapshot());

    device.teardown();
    Ok(())
}
