use num_bigint::{BigInt, Sign};
use thiserror::Error;

/// Errors produced while decoding or encoding a structured-binary payload.
#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("data too short: {0}")]
    DataTooShort(&'static str),

    #[error("invalid length: {0}")]
    InvalidLength(&'static str),

    #[error("parse error: {0}")]
    ParseError(&'static str),
}

/// Shared primitives for reading/writing 32-byte "words" out of a
/// structured-binary report payload.
pub struct ReportBase;

impl ReportBase {
    pub const WORD_SIZE: usize = 32;

    pub fn read_int192(data: &[u8], offset: usize) -> Result<BigInt, ReportError> {
        let word = data
            .get(offset..offset + Self::WORD_SIZE)
            .ok_or(ReportError::DataTooShort("int192"))?;
        Ok(BigInt::from_signed_bytes_be(word))
    }

    pub fn encode_int192(value: &BigInt) -> Result<[u8; 32], ReportError> {
        let bytes = value.to_signed_bytes_be();
        if bytes.len() > Self::WORD_SIZE {
            return Err(ReportError::InvalidLength("int192 overflow"));
        }
        Ok(pad_signed(&bytes, value.sign() == Sign::Minus))
    }

    pub fn read_uint192(data: &[u8], offset: usize) -> Result<BigInt, ReportError> {
        let word = data
            .get(offset..offset + Self::WORD_SIZE)
            .ok_or(ReportError::DataTooShort("uint192"))?;
        Ok(BigInt::from_bytes_be(Sign::Plus, word))
    }

    pub fn encode_uint192(value: &BigInt) -> Result<[u8; 32], ReportError> {
        if value.sign() == Sign::Minus {
            return Err(ReportError::InvalidLength("uint192 negative"));
        }
        let (_, bytes) = value.to_bytes_be();
        if bytes.len() > Self::WORD_SIZE {
            return Err(ReportError::InvalidLength("uint192 overflow"));
        }
        Ok(pad_unsigned(&bytes))
    }

    pub fn read_uint32(data: &[u8], offset: usize) -> Result<u32, ReportError> {
        let word = data
            .get(offset..offset + Self::WORD_SIZE)
            .ok_or(ReportError::DataTooShort("uint32"))?;
        let tail: [u8; 4] = word[28..32]
            .try_into()
            .map_err(|_| ReportError::InvalidLength("uint32"))?;
        Ok(u32::from_be_bytes(tail))
    }

    pub fn encode_uint32(value: u32) -> Result<[u8; 32], ReportError> {
        let mut word = [0u8; 32];
        word[28..32].copy_from_slice(&value.to_be_bytes());
        Ok(word)
    }

    pub fn read_uint64(data: &[u8], offset: usize) -> Result<u64, ReportError> {
        let word = data
            .get(offset..offset + Self::WORD_SIZE)
            .ok_or(ReportError::DataTooShort("uint64"))?;
        let tail: [u8; 8] = word[24..32]
            .try_into()
            .map_err(|_| ReportError::InvalidLength("uint64"))?;
        Ok(u64::from_be_bytes(tail))
    }

    pub fn encode_uint64(value: u64) -> Result<[u8; 32], ReportError> {
        let mut word = [0u8; 32];
        word[24..32].copy_from_slice(&value.to_be_bytes());
        Ok(word)
    }

    pub fn read_int64(data: &[u8], offset: usize) -> Result<i64, ReportError> {
        let word = data
            .get(offset..offset + Self::WORD_SIZE)
            .ok_or(ReportError::DataTooShort("int64"))?;
        let tail: [u8; 8] = word[24..32]
            .try_into()
            .map_err(|_| ReportError::InvalidLength("int64"))?;
        Ok(i64::from_be_bytes(tail))
    }

    pub fn encode_int64(value: i64) -> Result<[u8; 32], ReportError> {
        let fill = if value < 0 { 0xffu8 } else { 0u8 };
        let mut word = [fill; 32];
        word[24..32].copy_from_slice(&value.to_be_bytes());
        Ok(word)
    }
}

fn pad_unsigned(bytes: &[u8]) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(bytes);
    word
}

fn pad_signed(bytes: &[u8], negative: bool) -> [u8; 32] {
    let fill = if negative { 0xffu8 } else { 0u8 };
    let mut word = [fill; 32];
    if !bytes.is_empty() {
        word[32 - bytes.len()..].copy_from_slice(bytes);
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int192_round_trip_negative() {
        let value = BigInt::from(-12345);
        let encoded = ReportBase::encode_int192(&value).unwrap();
        let decoded = ReportBase::read_int192(&encoded, 0).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn uint192_round_trip() {
        let value = BigInt::from(98765u64);
        let encoded = ReportBase::encode_uint192(&value).unwrap();
        let decoded = ReportBase::read_uint192(&encoded, 0).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn uint32_round_trip() {
        let encoded = ReportBase::encode_uint32(1718885772).unwrap();
        assert_eq!(ReportBase::read_uint32(&encoded, 0).unwrap(), 1718885772);
    }

    #[test]
    fn uint64_round_trip() {
        let encoded = ReportBase::encode_uint64(u64::MAX - 1).unwrap();
        assert_eq!(ReportBase::read_uint64(&encoded, 0).unwrap(), u64::MAX - 1);
    }

    #[test]
    fn int64_round_trip_negative() {
        let encoded = ReportBase::encode_int64(-42).unwrap();
        assert_eq!(ReportBase::read_int64(&encoded, 0).unwrap(), -42);
    }

    #[test]
    fn data_too_short_is_reported() {
        let data = [0u8; 10];
        assert_eq!(
            ReportBase::read_uint32(&data, 0),
            Err(ReportError::DataTooShort("uint32"))
        );
    }
}
