use crate::SyncChannel;
use std::{
    io::{BufReader, BufWriter},
    os::unix::net::UnixStream,
};

/// A `SyncChannel` which uses `UnixStream`s.
pub type UnixChannel = SyncChannel<BufReader<UnixStream>, BufWriter<UnixStream>>;

/// Convenience function to create a pair of `UnixChannel`s for local tests.
pub fn unix_channel_pair() -> (UnixChannel, UnixChannel) {
    let (tx, rx) = UnixStream::pair().unwrap();
    let sender = SyncChannel::new(BufReader::new(tx.try_clone().unwrap()), BufWriter::new(tx));
    let receiver = SyncChannel::new(BufReader::new(rx.try_clone().unwrap()), BufWriter::new(rx));
    (sender, receiver)
}
