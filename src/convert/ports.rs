//! Port entry parsing.
//!
//! One raw entry yields a single [`PortBinding`], which is then viewed
//! twice: as a container port on the pod template and as a service port
//! on the network service. Both views come from the same binding so
//! they cannot disagree.

use crate::cluster::{ContainerPort, IntOrString, Protocol, ServicePort};
use crate::error::ConvertError;

/// A parsed port entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBinding {
    /// Port the container listens on.
    pub container_port: u16,
    /// Port published by the service, when given separately.
    pub external_port: Option<u16>,
    /// Transport protocol.
    pub protocol: Protocol,
}

impl PortBinding {
    /// Parses `port` or `external:internal`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidPort`] unless every number is a
    /// positive integer in port range.
    pub fn parse(service: &str, entry: &str) -> Result<Self, ConvertError> {
        let invalid = || ConvertError::InvalidPort {
            service: service.to_string(),
            entry: entry.to_string(),
        };

        let (external_port, container_port) = match entry.split_once(':') {
            Some((external, internal)) => (
                Some(parse_port(external).ok_or_else(invalid)?),
                parse_port(internal).ok_or_else(invalid)?,
            ),
            None => (None, parse_port(entry).ok_or_else(invalid)?),
        };

        Ok(Self {
            container_port,
            external_port,
            protocol: Protocol::default(),
        })
    }

    /// Port the service listens on; the container port if none was given.
    #[must_use]
    pub fn published_port(&self) -> u16 {
        self.external_port.unwrap_or(self.container_port)
    }

    /// Container-side view of this binding.
    #[must_use]
    pub fn container_port(&self) -> ContainerPort {
        ContainerPort {
            container_port: i32::from(self.container_port),
            protocol: self.protocol,
        }
    }

    /// Service-side view of this binding.
    ///
    /// The port is named after its number and targets the container port.
    #[must_use]
    pub fn service_port(&self) -> ServicePort {
        let published = self.published_port();
        ServicePort {
            name: published.to_string(),
            port: i32::from(published),
            protocol: self.protocol,
            target_port: IntOrString::int(i32::from(self.container_port)),
        }
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(entry: &str) -> Result<PortBinding, ConvertError> {
        PortBinding::parse("web", entry)
    }

    #[test]
    fn test_single_port_used_everywhere() {
        for entry in ["8080", "8080:8080"] {
            let binding = port(entry).unwrap();
            assert_eq!(binding.container_port().container_port, 8080);

            let svc = binding.service_port();
            assert_eq!(svc.port, 8080);
            assert_eq!(svc.target_port.int_val, 8080);
            assert_eq!(svc.target_port.str_val, "8080");
        }
    }

    #[test]
    fn test_external_and_internal() {
        let binding = port("80:8080").unwrap();
        assert_eq!(binding.container_port().container_port, 8080);

        let svc = binding.service_port();
        assert_eq!(svc.port, 80);
        assert_eq!(svc.name, "80");
        assert_eq!(svc.protocol, Protocol::Tcp);
        assert_eq!(svc.target_port, IntOrString::int(8080));
    }

    #[test]
    fn test_whitespace_around_parts() {
        let binding = port(" 80 : 8080 ").unwrap();
        assert_eq!(binding.external_port, Some(80));
        assert_eq!(binding.container_port, 8080);
    }

    #[test]
    fn test_invalid_ports() {
        for entry in ["http", "80:http", "0", "70000", "-1", "", "127.0.0.1:80:8080", "8080/udp"] {
            assert_eq!(
                port(entry),
                Err(ConvertError::InvalidPort {
                    service: String::from("web"),
                    entry: entry.to_string(),
                }),
                "entry {entry:?} should be rejected"
            );
        }
    }
}
