// Country and fuel lookup tables
use super::generation::Fuel;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Country {
    /// Value written to the dataset's Country column
    pub name: String,
    /// Upstream API country code
    pub code: String,
}

impl Country {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Maps upstream production-type names onto tracked fuels.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelNameTable {
    names: HashMap<String, Fuel>,
}

impl FuelNameTable {
    pub fn new(names: HashMap<String, Fuel>) -> Self {
        Self { names }
    }

    pub fn fuel_for(&self, production_type: &str) -> Option<Fuel> {
        self.names.get(production_type).copied()
    }
}

impl Default for FuelNameTable {
    fn default() -> Self {
        Self::new(HashMap::from([
            ("Fossil brown coal / lignite".to_string(), Fuel::Lignite),
            ("Fossil hard coal".to_string(), Fuel::HardCoal),
            ("Fossil gas".to_string(), Fuel::Gas),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fuel_names() {
        let table = FuelNameTable::default();
        assert_eq!(table.fuel_for("Fossil gas"), Some(Fuel::Gas));
        assert_eq!(table.fuel_for("Fossil brown coal / lignite"), Some(Fuel::Lignite));
        assert_eq!(table.fuel_for("Wind onshore"), None);
    }
}
