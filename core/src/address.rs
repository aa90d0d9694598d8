// Wire-format peer identity: IPv4 octets plus a port. The UDP layer hands
// us the sender's socket address out-of-band, so this type mostly exists
// to reject non-IPv4 senders and to format the fixed peer seed list.

use crate::error::AddressError;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// 4 octets + a 16-bit port, the wire form described in the protocol's
/// deserializer framework. None of the five current message variants
/// carry an `Address` on the wire, but the conversion exists because the
/// framework is general over it (see `to_wire_bytes`/`from_wire_bytes`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Address {
    pub octets: [u8; 4],
    pub port: u16,
}

impl Address {
    pub fn new(octets: [u8; 4], port: u16) -> Self {
        Address { octets, port }
    }

    pub fn to_socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::from(self.octets), self.port))
    }

    /// 4 octets followed by the port in network byte order: 6 bytes total.
    pub fn to_wire_bytes(&self) -> [u8; 6] {
        let mut out = [0u8; 6];
        out[..4].copy_from_slice(&self.octets);
        out[4..].copy_from_slice(&self.port.to_be_bytes());
        out
    }

    pub fn from_wire_bytes(bytes: &[u8; 6]) -> Self {
        let mut octets = [0u8; 4];
        octets.copy_from_slice(&bytes[..4]);
        let port = u16::from_be_bytes([bytes[4], bytes[5]]);
        Address { octets, port }
    }
}

impl TryFrom<SocketAddr> for Address {
    type Error = AddressError;

    fn try_from(addr: SocketAddr) -> Result<Self, AddressError> {
        match addr {
            SocketAddr::V4(v4) => Ok(Address::new(v4.ip().octets(), v4.port())),
            SocketAddr::V6(_) => Err(AddressError::NotIpv4),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}:{}",
            self.octets[0], self.octets[1], self.octets[2], self.octets[3], self.port
        )
    }
}

/// A peer known to the node. Carries no state beyond its address: there is
/// no handshake, reputation, or session in this network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Peer(pub Address);

impl Peer {
    pub fn new(octets: [u8; 4], port: u16) -> Self {
        Peer(Address::new(octets, port))
    }

    pub fn to_socket_addr(&self) -> SocketAddr {
        self.0.to_socket_addr()
    }
}

impl TryFrom<SocketAddr> for Peer {
    type Error = AddressError;

    fn try_from(addr: SocketAddr) -> Result<Self, AddressError> {
        Address::try_from(addr).map(Peer)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
