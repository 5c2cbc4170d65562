// Builds the transport's channel table from the protocol channel list
use bevy_quinnet::shared::channels::{ChannelKind, ChannelsConfiguration};

use crate::channels::{Reliability, CHANNELS};

pub fn build_channels_config() -> Result<ChannelsConfiguration, String> {
    let kinds = CHANNELS
        .iter()
        .map(|desc| match desc.reliability {
            Reliability::OrderedReliable { max_frame_size } => {
                ChannelKind::OrderedReliable { max_frame_size }
            }
            Reliability::UnorderedReliable { max_frame_size } => {
                ChannelKind::UnorderedReliable { max_frame_size }
            }
        })
        .collect::<Vec<_>>();
    ChannelsConfiguration::from_types(kinds).map_err(|e| format!("{e:?}"))
}
