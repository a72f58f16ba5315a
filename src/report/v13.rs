use crate::feed::ID;
use crate::report::base::{ReportBase, ReportError};

use num_bigint::BigInt;

/// # Solidity Equivalent
/// ```solidity
/// struct ReportDataV13 {
///     bytes32 feedId;
///     uint32 validFromTimestamp;
///     uint32 observationsTimestamp;
///     uint192 nativeFee;
///     uint192 linkFee;
///     uint32 expiresAt;
///     int192 bestAsk;
///     int192 bestBid;
///     uint64 askVolume;
///     uint64 bidVolume;
///     int192 lastTradedPrice;
/// }
/// ```
#[derive(Debug)]
pub struct ReportDataV13 {
    pub feed_id: ID,
    pub valid_from_timestamp: u32,
    pub observations_timestamp: u32,
    pub native_fee: BigInt,
    pub link_fee: BigInt,
    pub expires_at: u32,
    pub best_ask: BigInt,
    pub best_bid: BigInt,
    pub ask_volume: u64,
    pub bid_volume: u64,
    pub last_traded_price: BigInt,
}

impl ReportDataV13 {
    pub fn decode(data: &[u8]) -> Result<Self, ReportError> {
        if data.len() < 11 * ReportBase::WORD_SIZE {
            return Err(ReportError::DataTooShort("ReportDataV13"));
        }

        let feed_id = ID(data[..ReportBase::WORD_SIZE]
            .try_into()
            .map_err(|_| ReportError::InvalidLength("feed_id (bytes32)"))?);

        let valid_from_timestamp = ReportBase::read_uint32(data, ReportBase::WORD_SIZE)?;
        let observations_timestamp = ReportBase::read_uint32(data, 2 * ReportBase::WORD_SIZE)?;
        let native_fee = ReportBase::read_uint192(data, 3 * ReportBase::WORD_SIZE)?;
        let link_fee = ReportBase::read_uint192(data, 4 * ReportBase::WORD_SIZE)?;
        let expires_at = ReportBase::read_uint32(data, 5 * ReportBase::WORD_SIZE)?;
        let best_ask = ReportBase::read_int192(data, 6 * ReportBase::WORD_SIZE)?;
        let best_bid = ReportBase::read_int192(data, 7 * ReportBase::WORD_SIZE)?;
        let ask_volume = ReportBase::read_uint64(data, 8 * ReportBase::WORD_SIZE)?;
        let bid_volume = ReportBase::read_uint64(data, 9 * ReportBase::WORD_SIZE)?;
        let last_traded_price = ReportBase::read_int192(data, 10 * ReportBase::WORD_SIZE)?;

        Ok(Self {
            feed_id,
            valid_from_timestamp,
            observations_timestamp,
            native_fee,
            link_fee,
            expires_at,
            best_ask,
            best_bid,
            ask_volume,
            bid_volume,
            last_traded_price,
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
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.best_ask)?);
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.best_bid)?);
        buffer.extend_from_slice(&ReportBase::encode_uint64(self.ask_volume)?);
        buffer.extend_from_slice(&ReportBase::encode_uint64(self.bid_volume)?);
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.last_traded_price)?);

        Ok(buffer)
    }
}
