//! Fixed catalog of destination ports

use fleet_api::Port;

/// Immutable, ordered set of ports.
///
/// Iteration order is insertion order and is relied upon by the resolver's
/// tie-break.
#[derive(Clone, Debug)]
pub struct PortCatalog {
    ports: Vec<Port>,
}

impl PortCatalog {
    /// The built-in catalog: Kandla, Mundra, Jamnagar
    pub fn standard() -> Self {
        Self::from_ports(vec![
            Port::new(1, "Kandla Port", 23.00, 70.18),
            Port::new(2, "Mundra Port", 22.74, 69.70),
            Port::new(3, "Jamnagar Port", 22.47, 70.05),
        ])
    }

    /// Build a catalog from an explicit port list, keeping its order
    pub fn from_ports(ports: Vec<Port>) -> Self {
        Self { ports }
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl Default for PortCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_order() {
        let catalog = PortCatalog::standard();
        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Kandla Port", "Mundra Port", "Jamnagar Port"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_explicit_ports_keep_order() {
        let catalog = PortCatalog::from_ports(vec![
            Port::new(7, "Okha Port", 22.47, 69.07),
            Port::new(2, "Mundra Port", 22.74, 69.70),
        ]);
        let ids: Vec<u32> = catalog.ports().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7, 2]);
        assert!(!catalog.is_empty());
        assert!(PortCatalog::from_ports(vec![]).is_empty());
    }
}
