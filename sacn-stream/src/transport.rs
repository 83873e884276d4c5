// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Datagram transports packets are handed to.

use std::{
    io,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

/// Size of the send buffer requested from the operating system
pub const SEND_BUFFER_SIZE: usize = 4096;

/// Sends finished packets to a destination.
pub trait Transport {
    /// Sends the whole of `packet` as a single datagram to `destination`.
    fn send_to(&mut self, packet: &[u8], destination: SocketAddrV4) -> io::Result<()>;

    /// Selects the local interface outgoing multicast leaves from.
    fn set_interface(&mut self, _interface: Ipv4Addr) -> io::Result<()> {
        Ok(())
    }
}

/// A non blocking IPv4 UDP socket for sending multicast datagrams
#[derive(Debug)]
pub struct MulticastTransport {
    socket: Socket,
}

impl MulticastTransport {
    /// Creates the socket bound to an ephemeral port on all interfaces.
    ///
    /// Multicast leaves through `interface` if given, otherwise through the interface the system picks.
    pub fn new(interface: Option<Ipv4Addr>, multicast_ttl: u32) -> io::Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

        socket.set_reuse_address(true)?;
        socket.set_broadcast(false)?;
        socket.set_send_buffer_size(SEND_BUFFER_SIZE)?;
        socket.set_multicast_ttl_v4(multicast_ttl)?;
        if let Some(interface) = interface {
            socket.set_multicast_if_v4(&interface)?;
        }

        let bind_addr = SocketAddr::from(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
        socket.bind(&SockAddr::from(bind_addr))?;
        socket.set_nonblocking(true)?;

        let transport = Self { socket };
        tracing::debug!(?interface, multicast_ttl, local = ?transport.local_addr().ok(), "multicast transport ready");

        Ok(transport)
    }

    /// The address the socket is bound to
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket
            .local_addr()?
            .as_socket()
            .ok_or_else(|| io::Error::other("socket is not an inet socket"))
    }
}

impl Transport for MulticastTransport {
    fn send_to(&mut self, packet: &[u8], destination: SocketAddrV4) -> io::Result<()> {
        let sent = self.socket.send_to(packet, &SockAddr::from(destination))?;
        if sent != packet.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("datagram truncated, sent {sent} of {} bytes", packet.len()),
            ));
        }
        Ok(())
    }

    fn set_interface(&mut self, interface: Ipv4Addr) -> io::Result<()> {
        self.socket.set_multicast_if_v4(&interface)?;
        tracing::debug!(%interface, "multicast interface set");
        Ok(())
    }
}
