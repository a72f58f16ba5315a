use crate::feed::ID;
use crate::report::base::{ReportBase, ReportError};

use num_bigint::BigInt;

/// # Solidity Equivalent
/// ```solidity
/// struct ReportDataV6 {
///     bytes32 feedId;
///     uint32 validFromTimestamp;
///     uint32 observationsTimestamp;
///     uint192 nativeFee;
///     uint192 linkFee;
///     uint32 expiresAt;
///     int192 price;
///     int192 price2;
///     int192 price3;
///     int192 price4;
///     int192 price5;
/// }
/// ```
#[derive(Debug)]
pub struct ReportDataV6 {
    pub feed_id: ID,
    pub valid_from_timestamp: u32,
    pub observations_timestamp: u32,
    pub native_fee: BigInt,
    pub link_fee: BigInt,
    pub expires_at: u32,
    pub price: BigInt,
    pub price2: BigInt,
    pub price3: BigInt,
    pub price4: BigInt,
    pub price5: BigInt,
}

impl ReportDataV6 {
    pub fn decode(data: &[u8]) -> Result<Self, ReportError> {
        if data.len() < 11 * ReportBase::WORD_SIZE {
            return Err(ReportError::DataTooShort("ReportDataV6"));
        }

        let feed_id = ID(data[..ReportBase::WORD_SIZE]
            .try_into()
            .map_err(|_| ReportError::InvalidLength("feed_id (bytes32)"))?);

        let valid_from_timestamp = ReportBase::read_uint32(data, ReportBase::WORD_SIZE)?;
        let observations_timestamp = ReportBase::read_uint32(data, 2 * ReportBase::WORD_SIZE)?;
        let native_fee = ReportBase::read_uint192(data, 3 * ReportBase::WORD_SIZE)?;
        let link_fee = ReportBase::read_uint192(data, 4 * ReportBase::WORD_SIZE)?;
        let expires_at = ReportBase::read_uint32(data, 5 * ReportBase::WORD_SIZE)?;
        let price = ReportBase::read_int192(data, 6 * ReportBase::WORD_SIZE)?;
        let price2 = ReportBase::read_int192(data, 7 * ReportBase::WORD_SIZE)?;
        let price3 = ReportBase::read_int192(data, 8 * ReportBase::WORD_SIZE)?;
        let price4 = ReportBase::read_int192(data, 9 * ReportBase::WORD_SIZE)?;
        let price5 = ReportBase::read_int192(data, 10 * ReportBase::WORD_SIZE)?;

        Ok(Self {
            feed_id,
            valid_from_timestamp,
            observations_timestamp,
            native_fee,
            link_fee,
            expires_at,
            price,
            price2,
            price3,
            price4,
            price5,
        })
    }

    pub fn abi_encode(&self) -> Result<Vec<u8>, ReportError> {
        let mut buffer = Vec::with_capacity(11 * ReportBase::WORD_SIZE);

        buffer.extend_from_slice(&self.feed_id.0);
        buffer.extend_from_slice(&ReportBase::encode_uint32(self.valid_from_timestamp)?);
        buffer.extend_from_slice(&ReportBase::encode_uint32(self.observations_timestamp)?);
        buffer.extend_from_slice(&ReportBase::encode_uint192(&self.native_fee)?);
        buffer.extend_from_slice(&ReportBase::encode_uint192(&self.link_fee)?);
        buffer.extend_from_slice(&ReportBase::encode_uint32(self.expires_at)?);
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.price)?);
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.price2)?);
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.price3)?);
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.price4)?);
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.price5)?);

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::{generate_mock_report_data_v6, MOCK_FEE, MOCK_PRICE, MOCK_TIMESTAMP};

    const V6_FEED_ID_STR: &str =
        "0x00066b4aa7e57ca7b68ae1bf45653f56b656fd3aa335ef7fae696b663f1b8472";

    #[test]
    fn test_decode_report_data_v6() {
        let report_data = generate_mock_report_data_v6();
        let encoded = report_data.abi_encode().unwrap();
        let decoded = ReportDataV6::decode(&encoded).unwrap();

        let expected_feed_id = ID::from_hex_str(V6_FEED_ID_STR).unwrap();
        let expected_timestamp: u32 = MOCK_TIMESTAMP;
        let expected_fee = BigInt::from(MOCK_FEE);
        let expected_price = BigInt::from(MOCK_PRICE);

        assert_eq!(decoded.feed_id, expected_feed_id);
        assert_eq!(decoded.valid_from_timestamp, expected_timestamp);
        assert_eq!(decoded.observations_timestamp, expected_timestamp);
        assert_eq!(decoded.native_fee, expected_fee);
        assert_eq!(decoded.link_fee, expected_fee);
        assert_eq!(decoded.expires_at, expected_timestamp + 100);
        assert_eq!(decoded.price, expected_price);
        assert_eq!(decoded.price2, &expected_price + 1);
        assert_eq!(decoded.price3, &expected_price + 2);
        assert_eq!(decoded.price4, &expected_price + 3);
        assert_eq!(decoded.price5, &expected_price + 4);
    }
}
