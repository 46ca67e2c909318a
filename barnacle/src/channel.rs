mod sync_channel;
#[cfg(unix)]
mod unix_channel;

pub use sync_channel::SyncChannel;

#[cfg(unix)]
pub use unix_channel::{unix_channel_pair, UnixChannel};

use crate::WireKey;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use std::{
    cell::RefCell,
    io::{Read, Result, Write},
    rc::Rc,
};

/// A trait for managing I/O. `AbstractChannel`s are clonable, and provide
/// basic read/write capabilities for both common and workspace-specific
/// types.
pub trait AbstractChannel {
    /// Read a slice of `u8`s from the channel.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()>;
    /// Write a slice of `u8`s to the channel.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
    /// Flush the channel.
    fn flush(&mut self) -> Result<()>;
    /// Clone the channel.
    fn clone(&self) -> Self
    where
        Self: Sized;

    /// Read `nbytes` from the channel, and return it as a `Vec`.
    fn read_vec(&mut self, nbytes: usize) -> Result<Vec<u8>> {
        let mut data = vec![0; nbytes];
        self.read_bytes(&mut data)?;
        Ok(data)
    }

    /// Write a `bool` to the channel.
    #[inline(always)]
    fn write_bool(&mut self, b: bool) -> Result<()> {
        self.write_bytes(&[b as u8])?;
        Ok(())
    }

    /// Read a `bool` from the channel.
    #[inline(always)]
    fn read_bool(&mut self) -> Result<bool> {
        let mut data = [0u8; 1];
        self.read_bytes(&mut data)?;
        Ok(data[0] != 0)
    }

    /// Write a `u8` to the channel.
    #[inline(always)]
    fn write_u8(&mut self, s: u8) -> Result<()> {
        let data = [s];
        self.write_bytes(&data)?;
        Ok(())
    }

    /// Read a `u8` from the channel.
    #[inline(always)]
    fn read_u8(&mut self) -> Result<u8> {
        let mut data = [0];
        self.read_bytes(&mut data)?;
        Ok(data[0])
    }

    /// Write a `u16` to the channel.
    #[inline(always)]
    fn write_u16(&mut self, s: u16) -> Result<()> {
        let data: [u8; 2] = s.to_le_bytes();
        self.write_bytes(&data)?;
        Ok(())
    }

    /// Read a `u16` from the channel.
    #[inline(always)]
    fn read_u16(&mut self) -> Result<u16> {
        let mut data = [0u8; 2];
        self.read_bytes(&mut data)?;
        Ok(u16::from_le_bytes(data))
    }

    /// Write a `u64` to the channel.
    #[inline(always)]
    fn write_u64(&mut self, s: u64) -> Result<()> {
        let data: [u8; 8] = s.to_le_bytes();
        self.write_bytes(&data)?;
        Ok(())
    }

    /// Read a `u64` from the channel.
    #[inline(always)]
    fn read_u64(&mut self) -> Result<u64> {
        let mut data = [0u8; 8];
        self.read_bytes(&mut data)?;
        Ok(u64::from_le_bytes(data))
    }

    /// Write a `usize` to the channel.
    #[inline(always)]
    fn write_usize(&mut self, s: usize) -> Result<()> {
        self.write_u64(s as u64)
    }

    /// Read a `usize` from the channel.
    #[inline(always)]
    fn read_usize(&mut self) -> Result<usize> {
        let x = self.read_u64()?;
        usize::try_from(x).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Write a `WireKey` to the channel.
    #[inline(always)]
    fn write_key(&mut self, key: &WireKey) -> Result<()> {
        self.write_bytes(key.as_ref())?;
        Ok(())
    }

    /// Read a `WireKey` from the channel.
    #[inline(always)]
    fn read_key(&mut self) -> Result<WireKey> {
        let mut key = WireKey::default();
        self.read_bytes(key.as_mut())?;
        Ok(key)
    }

    /// Read `n` `WireKey`s from the channel.
    #[inline(always)]
    fn read_keys(&mut self, n: usize) -> Result<Vec<WireKey>> {
        (0..n).map(|_| self.read_key()).collect()
    }

    /// Write a 256-bit digest to the channel.
    #[inline(always)]
    fn write_digest(&mut self, digest: &[u8; 32]) -> Result<()> {
        self.write_bytes(digest)
    }

    /// Read a 256-bit digest from the channel.
    #[inline(always)]
    fn read_digest(&mut self) -> Result<[u8; 32]> {
        let mut digest = [0u8; 32];
        self.read_bytes(&mut digest)?;
        Ok(digest)
    }

    /// Write a `RistrettoPoint` to the channel.
    #[inline(always)]
    fn write_pt(&mut self, pt: &RistrettoPoint) -> Result<()> {
        self.write_bytes(pt.compress().as_bytes())?;
        Ok(())
    }

    /// Read a `RistrettoPoint` from the channel.
    #[inline(always)]
    fn read_pt(&mut self) -> Result<RistrettoPoint> {
        let mut data = [0u8; 32];
        self.read_bytes(&mut data)?;
        let pt = match CompressedRistretto::from_slice(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?
            .decompress()
        {
            Some(pt) => pt,
            None => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "unable to decompress ristretto point",
                ));
            }
        };
        Ok(pt)
    }
}

/// A standard read/write channel that implements `AbstractChannel`.
pub struct Channel<R, W> {
    reader: Rc<RefCell<R>>,
    writer: Rc<RefCell<W>>,
}

impl<R: Read, W: Write> Channel<R, W> {
    /// Make a new `Channel` from a `reader` and a `writer`.
    pub fn new(reader: R, writer: W) -> Self {
        let reader = Rc::new(RefCell::new(reader));
        let writer = Rc::new(RefCell::new(writer));
        Self { reader, writer }
    }

    /// Return a reader object wrapped in `Rc<RefCell>`.
    pub fn reader(self) -> Rc<RefCell<R>> {
        self.reader
    }

    /// Return a writer object wrapped in `Rc<RefCell>`.
    pub fn writer(self) -> Rc<RefCell<W>> {
        self.writer
    }
}

impl<R: Read, W: Write> AbstractChannel for Channel<R, W> {
    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.borrow_mut().write_all(bytes)?;
        Ok(())
    }

    #[inline(always)]
    fn read_bytes(&mut self, mut bytes: &mut [u8]) -> Result<()> {
        self.reader.borrow_mut().read_exact(&mut bytes)
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        self.writer.borrow_mut().flush()
    }

    #[inline(always)]
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            writer: self.writer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn roundtrips_through_a_unix_channel() {
        let mut rng = OsRng;
        let key = WireKey::rand(&mut rng).unwrap();
        let digest = rand::random::<[u8; 32]>();
        let (mut sender, mut receiver) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            sender.write_bool(true).unwrap();
            sender.write_u16(0x0102).unwrap();
            sender.write_u64(7).unwrap();
            sender.write_key(&key).unwrap();
            sender.write_digest(&digest).unwrap();
            sender.flush().unwrap();
        });
        assert!(receiver.read_bool().unwrap());
        assert_eq!(receiver.read_u16().unwrap(), 0x0102);
        assert_eq!(receiver.read_u64().unwrap(), 7);
        assert_eq!(receiver.read_key().unwrap(), key);
        assert_eq!(receiver.read_digest().unwrap(), digest);
        handle.join().unwrap();
    }

    #[test]
    fn roundtrips_through_an_in_memory_channel() {
        let mut rng = OsRng;
        let key = WireKey::rand(&mut rng).unwrap();
        let mut tx = Channel::new(std::io::empty(), Vec::new());
        tx.write_key(&key).unwrap();
        tx.write_u64(99).unwrap();
        tx.flush().unwrap();
        let buf = Rc::try_unwrap(tx.writer()).unwrap().into_inner();
        let mut rx = Channel::new(std::io::Cursor::new(buf), std::io::sink());
        assert_eq!(rx.read_key().unwrap(), key);
        assert_eq!(rx.read_u64().unwrap(), 99);
    }

    #[test]
    fn roundtrips_a_ristretto_point() {
        let mut rng = OsRng;
        let pt = curve25519_dalek::ristretto::RistrettoPoint::random(&mut rng);
        let (mut sender, mut receiver) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            sender.write_pt(&pt).unwrap();
            sender.flush().unwrap();
            pt
        });
        let received = receiver.read_pt().unwrap();
        assert_eq!(received, handle.join().unwrap());
    }
}
