use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use bevy::prelude::*;
use bevy_quinnet::client::certificate::CertificateVerificationMode;
use bevy_quinnet::client::connection::ClientEndpointConfiguration;
use bevy_quinnet::client::QuinnetClient;
use gridsync_protocol::constants::{CH_C2S, CH_S2C};
use gridsync_protocol::quinnet_adapter::build_channels_config;

use crate::config::ClientConfig;
use crate::resources::{ErrorBanner, Inbox, Outbox};

pub fn open_server_connection(
    config: Res<ClientConfig>,
    mut client: ResMut<QuinnetClient>,
    mut banner: ResMut<ErrorBanner>,
) {
    let server_addr: SocketAddr = match config.server_addr.parse() {
        Ok(addr) => addr,
        Err(_) => {
            error!("invalid server address {}", config.server_addr);
            banner.show(format!("invalid server address {}", config.server_addr));
            return;
        }
    };
    let channels = match build_channels_config() {
        Ok(channels) => channels,
        Err(e) => {
            error!("invalid channel config: {e}");
            return;
        }
    };
    let local_bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
    let endpoint_config = ClientEndpointConfiguration::from_addrs(server_addr, local_bind_addr);
    match client.open_connection(
        endpoint_config,
        CertificateVerificationMode::SkipVerification,
        channels,
    ) {
        Ok(_) => info!("connecting to {server_addr}"),
        Err(e) => {
            error!("cannot connect to {server_addr}: {e:?}");
            banner.show(format!("cannot connect to {server_addr}"));
        }
    }
}

/// Moves text frames between the connection and the inbox/outbox. Outbound
/// frames stay queued until a connection exists.
pub fn pump_connection(
    mut client: ResMut<QuinnetClient>,
    mut inbox: ResMut<Inbox>,
    mut outbox: ResMut<Outbox>,
) {
    let Some(conn) = client.get_connection_mut() else {
        return;
    };
    while let Some((chan, frame)) = conn.try_receive_message::<String>() {
        if chan != CH_S2C {
            continue;
        }
        inbox.push(frame);
    }
    for frame in outbox.drain() {
        if let Err(e) = conn.send_message_on(CH_C2S, frame) {
            warn!("cannot send frame: {e:?}");
        }
    }
}
