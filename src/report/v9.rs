use crate::feed::ID;
use crate::report::base::{ReportBase, ReportError};

use num_bigint::BigInt;

/// NAV Data Streams schema.
///
/// # Ripcord Flag
/// - `0`: the feed's data provider is operating normally.
/// - non-zero: an emergency halt has been raised; consumers MUST ignore the
///   payload while set.
///
/// # Solidity Equivalent
/// ```solidity
/// struct ReportDataV9 {
///     bytes32 feedId;
///     uint32 validFromTimestamp;
///     uint32 observationsTimestamp;
///     uint192 nativeFee;
///     uint192 linkFee;
///     uint32 expiresAt;
///     int192 navPerShare;
///     uint64 navDate;
///     int192 aum;
///     uint32 ripcord;
/// }
/// ```
#[derive(Debug)]
pub struct ReportDataV9 {
    pub feed_id: ID,
    pub valid_from_timestamp: u32,
    pub observations_timestamp: u32,
    pub native_fee: BigInt,
    pub link_fee: BigInt,
    pub expires_at: u32,
    pub nav_per_share: BigInt,
    pub nav_date: u64,
    pub aum: BigInt,
    pub ripcord: u32,
}

impl ReportDataV9 {
    pub fn decode(data: &[u8]) -> Result<Self, ReportError> {
        if data.len() < 10 * ReportBase::WORD_SIZE {
            return Err(ReportError::DataTooShort("ReportDataV9"));
        }

        let feed_id = ID(data[..ReportBase::WORD_SIZE]
            .try_into()
            .map_err(|_| ReportError::InvalidLength("feed_id (bytes32)"))?);

        let valid_from_timestamp = ReportBase::read_uint32(data, ReportBase::WORD_SIZE)?;
        let observations_timestamp = ReportBase::read_uint32(data, 2 * ReportBase::WORD_SIZE)?;
        let native_fee = ReportBase::read_uint192(data, 3 * ReportBase::WORD_SIZE)?;
        let link_fee = ReportBase::read_uint192(data, 4 * ReportBase::WORD_SIZE)?;
        let expires_at = ReportBase::read_uint32(data, 5 * ReportBase::WORD_SIZE)?;
        let nav_per_share = ReportBase::read_int192(data, 6 * ReportBase::WORD_SIZE)?;
        let nav_date = ReportBase::read_uint64(data, 7 * ReportBase::WORD_SIZE)?;
        let aum = ReportBase::read_int192(data, 8 * ReportBase::WORD_SIZE)?;
        let ripcord = ReportBase::read_uint32(data, 9 * ReportBase::WORD_SIZE)?;

        Ok(Self {
            feed_id,
            valid_from_timestamp,
            observations_timestamp,
            native_fee,
            link_fee,
            expires_at,
            nav_per_share,
            nav_date,
            aum,
            ripcord,
        })
    }

    pub fn abi_encode(&self) -> Result<Vec<u8>, ReportError> {
        let mut buffer = Vec::with_capacity(10 * ReportBase::WORD_SIZE);

        buffer.extend_from_slice(&self.feed_id.0);
        buffer.extend_from_slice(&ReportBase::encode_uint32(self.valid_from_timestamp)?);
        buffer.extend_from_slice(&ReportBase::encode_uint32(self.observations_timestamp)?);
        buffer.extend_from_slice(&ReportBase::encode_uint192(&self.native_fee)?);
        buffer.extend_from_slice(&ReportBase::encode_uint192(&self.link_fee)?);
        buffer.extend_from_slice(&ReportBase::encode_uint32(self.expires_at)?);
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.nav_per_share)?);
        buffer.extend_from_slice(&ReportBase::encode_uint64(self.nav_date)?);
        buffer.extend_from_slice(&ReportBase::encode_int192(&self.aum)?);
        buffer.extend_from_slice(&ReportBase::encode_uint32(self.ripcord)?);

        Ok(buffer)
    }
}
