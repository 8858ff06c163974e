use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Context;
use log::info;
use socket2::{Domain, Protocol, Socket, Type};

/// Binds a non-blocking UDP socket for TS reception, joining the group when
/// `addr` is an IPv4 multicast address.
pub fn create_udp_socket(addr: SocketAddr) -> anyhow::Result<Socket> {
    let IpAddr::V4(ip) = addr.ip() else {
        anyhow::bail!("only IPv4 is supported");
    };

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into()).with_context(|| format!("binding {addr}"))?;

    if ip.is_multicast() {
        socket
            .join_multicast_v4(&ip, &Ipv4Addr::UNSPECIFIED)
            .with_context(|| format!("joining multicast group {ip}"))?;
        info!("joined multicast group {ip}");
    }

    socket.set_nonblocking(true)?;
    Ok(socket)
}
