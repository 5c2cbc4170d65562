use crate::constants::{CH_C2S, CH_S2C};

/// Channel reliability, independent of the transport crate.
#[derive(Clone, Copy, Debug)]
pub enum Reliability {
    OrderedReliable { max_frame_size: usize },
    UnorderedReliable { max_frame_size: usize },
}

#[derive(Clone, Copy, Debug)]
pub struct ChannelDesc {
    pub id: u8,
    pub reliability: Reliability,
}

/// Text frames are ordered in both directions: an AOI update must never be
/// applied after a newer one.
pub const CHANNELS: &[ChannelDesc] = &[
    ChannelDesc { id: CH_C2S, reliability: Reliability::OrderedReliable { max_frame_size: 64_000 } },
    ChannelDesc { id: CH_S2C, reliability: Reliability::OrderedReliable { max_frame_size: 256_000 } },
];
