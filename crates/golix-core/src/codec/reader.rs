//! Positional record parsing

use super::{layout_for, Header, ObjectKind, Packed};
use crate::address::Address;
use crate::crypto::address_algo::digest_len;
use crate::crypto::Registry;
use crate::error::{GolixError, GolixResult};
use tracing::{trace, warn};

/// Cursor over a record that reports truncation and trailing bytes as
/// format errors.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn take(&mut self, len: usize, what: &str) -> GolixResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(GolixError::Format(format!(
                "Truncated {}: need {} bytes at offset {}, have {}",
                what,
                len,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, what: &str) -> GolixResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    pub fn u8(&mut self, what: &str) -> GolixResult<u8> {
        Ok(self.take(1, what)?[0])
    }

    pub fn u16(&mut self, what: &str) -> GolixResult<u16> {
        self.array(what).map(u16::from_be_bytes)
    }

    pub fn u32(&mut self, what: &str) -> GolixResult<u32> {
        self.array(what).map(u32::from_be_bytes)
    }

    pub fn u64(&mut self, what: &str) -> GolixResult<u64> {
        self.array(what).map(u64::from_be_bytes)
    }

    /// Read an address, returning it with the offset its digest starts at.
    ///
    /// That offset is the exact prefix length hashed into the address.
    pub fn address_field(&mut self, what: &str) -> GolixResult<(Address, usize)> {
        let algo = self.u8(what)?;
        let len = digest_len(algo).ok_or_else(|| {
            GolixError::Format(format!("Unknown address algorithm {} in {}", algo, what))
        })?;
        let digest_start = self.pos;
        let digest = self.take(len, what)?;
        let address = Address::new(algo, digest).map_err(GolixError::into_format)?;
        Ok((address, digest_start))
    }

    pub fn address(&mut self, what: &str) -> GolixResult<Address> {
        self.address_field(what).map(|(address, _)| address)
    }

    /// Parse and check `magic | version | cipher` against the expected kind.
    pub fn header(&mut self, expected: ObjectKind, registry: &Registry) -> GolixResult<Header> {
        let magic = self.take(4, "magic")?;
        let version = self.u32("version")?;
        let layout = layout_for(magic, version)?;
        if layout.kind != expected {
            return Err(GolixError::Format(format!(
                "Expected a {} record, found a {} record",
                expected, layout.kind
            )));
        }
        let cipher = self.u8("cipher")?;
        let suite = registry
            .cipher_suite(cipher)
            .map_err(GolixError::into_format)?;
        Ok(Header {
            layout,
            cipher,
            lengths: suite.lengths(),
        })
    }

    /// Fail unless every byte was consumed.
    pub fn finish(&self) -> GolixResult<()> {
        if self.remaining() != 0 {
            return Err(GolixError::Format(format!(
                "{} trailing bytes after record",
                self.remaining()
            )));
        }
        Ok(())
    }

    /// Recompute `address` over the first `prefix_end` bytes.
    ///
    /// # Errors
    ///
    /// [`GolixError::Integrity`] on mismatch, [`GolixError::Format`] when the
    /// algorithm is not selectable.
    pub fn verify_address(
        &self,
        registry: &Registry,
        address: &Address,
        prefix_end: usize,
        kind: ObjectKind,
    ) -> GolixResult<()> {
        let algo = registry
            .address_algo(address.algo())
            .map_err(GolixError::into_format)?;
        algo.verify(address.digest(), &self.data[..prefix_end])
            .inspect_err(|_| {
                warn!(%kind, algo = address.algo(), %address, "Address integrity check failed");
            })
    }

    /// Read the final address and trailer, verify the address and wrap the
    /// whole record.
    pub fn finish_record(mut self, header: &Header, registry: &Registry) -> GolixResult<Packed> {
        let kind = header.layout.kind;
        let (address, digest_start) = self.address_field("address")?;
        let trailer_len = header.layout.trailer.len(&header.lengths);
        self.take(trailer_len, "signature")?;
        self.finish()?;
        self.verify_address(registry, &address, digest_start, kind)?;

        trace!(%kind, cipher = header.cipher, len = self.data.len(), %address, "Unpacked record");

        Ok(Packed {
            kind,
            version: header.layout.version,
            cipher: header.cipher,
            address,
            trailer_len,
            bytes: self.data.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_is_format_error() {
        let mut reader = Reader::new(&[0, 1, 2]);
        assert_eq!(reader.u16("a").unwrap(), 1);
        assert!(reader.u32("b").unwrap_err().is_format());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut reader = Reader::new(&[7, 8]);
        reader.u8("a").unwrap();
        assert!(reader.finish().unwrap_err().is_format());
    }

    #[test]
    fn test_address_field_offset() {
        let address = Address::pseudorandom(1).unwrap();
        let mut bytes = vec![0xAA, 0xBB];
        bytes.extend_from_slice(&address.to_bytes());

        let mut reader = Reader::new(&bytes);
        reader.take(2, "prefix").unwrap();
        let (parsed, digest_start) = reader.address_field("address").unwrap();
        assert_eq!(parsed, address);
        assert_eq!(digest_start, 3);
        reader.finish().unwrap();
    }

    #[test]
    fn test_unknown_address_algo_is_format_error() {
        let mut bytes = vec![9u8];
        bytes.extend_from_slice(&[0u8; 64]);
        let err = Reader::new(&bytes).address("address").unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_header_checks_kind_and_cipher() {
        let registry = Registry::production();

        let mut bytes = b"GEOC".to_vec();
        bytes.extend_from_slice(&14u32.to_be_bytes());
        bytes.push(1);
        let header = Reader::new(&bytes).header(ObjectKind::Container, &registry).unwrap();
        assert_eq!(header.cipher, 1);

        let err = Reader::new(&bytes)
            .header(ObjectKind::StaticBinding, &registry)
            .unwrap_err();
        assert!(err.is_format());

        // Suite 0 is refused in production, and reported as a parse failure
        let last = bytes.len() - 1;
        bytes[last] = 0;
        let err = Reader::new(&bytes).header(ObjectKind::Container, &registry).unwrap_err();
        assert!(err.is_format());
    }
}
