//! Static chemical reference data: a compact periodic table (atomic masses,
//! proton and neutron numbers, including deuterium as a separate entry) and a
//! table of grain-surface binding energies in Kelvin taken from the RATE12
//! surface network compilation.

/// Element record. `neutrons` refers to the most abundant isotope, so the
/// mass number of a molecule is an integer sum over its composition.
#[derive(Debug, Clone, Copy)]
pub struct Element {
    pub symbol: &'static str,
    pub atomic_mass: f64,
    pub protons: u32,
    pub neutrons: u32,
}

pub const PERIODIC_TABLE: &[Element] = &[
    Element { symbol: "H", atomic_mass: 1.008, protons: 1, neutrons: 0 },
    Element { symbol: "D", atomic_mass: 2.014, protons: 1, neutrons: 1 },
    Element { symbol: "He", atomic_mass: 4.0026, protons: 2, neutrons: 2 },
    Element { symbol: "Li", atomic_mass: 6.94, protons: 3, neutrons: 4 },
    Element { symbol: "B", atomic_mass: 10.81, protons: 5, neutrons: 6 },
    Element { symbol: "C", atomic_mass: 12.011, protons: 6, neutrons: 6 },
    Element { symbol: "N", atomic_mass: 14.007, protons: 7, neutrons: 7 },
    Element { symbol: "O", atomic_mass: 15.999, protons: 8, neutrons: 8 },
    Element { symbol: "F", atomic_mass: 18.998, protons: 9, neutrons: 10 },
    Element { symbol: "Ne", atomic_mass: 20.180, protons: 10, neutrons: 10 },
    Element { symbol: "Na", atomic_mass: 22.990, protons: 11, neutrons: 12 },
    Element { symbol: "Mg", atomic_mass: 24.305, protons: 12, neutrons: 12 },
    Element { symbol: "Al", atomic_mass: 26.982, protons: 13, neutrons: 14 },
    Element { symbol: "Si", atomic_mass: 28.085, protons: 14, neutrons: 14 },
    Element { symbol: "P", atomic_mass: 30.974, protons: 15, neutrons: 16 },
    Element { symbol: "S", atomic_mass: 32.06, protons: 16, neutrons: 16 },
    Element { symbol: "Cl", atomic_mass: 35.45, protons: 17, neutrons: 18 },
    Element { symbol: "Ar", atomic_mass: 39.948, protons: 18, neutrons: 22 },
    Element { symbol: "K", atomic_mass: 39.098, protons: 19, neutrons: 20 },
    Element { symbol: "Ca", atomic_mass: 40.078, protons: 20, neutrons: 20 },
    Element { symbol: "Ti", atomic_mass: 47.867, protons: 22, neutrons: 26 },
    Element { symbol: "Cr", atomic_mass: 51.996, protons: 24, neutrons: 28 },
    Element { symbol: "Mn", atomic_mass: 54.938, protons: 25, neutrons: 30 },
    Element { symbol: "Fe", atomic_mass: 55.845, protons: 26, neutrons: 30 },
    Element { symbol: "Ni", atomic_mass: 58.693, protons: 28, neutrons: 31 },
    Element { symbol: "Zn", atomic_mass: 65.38, protons: 30, neutrons: 34 },
];

/// Binding energies (desorption energies) of common ice-mantle species on
/// grain surfaces, in Kelvin. Keys are the gas-phase species names.
pub const BINDING_ENERGIES: &[(&str, f64)] = &[
    ("H", 600.0),
    ("D", 600.0),
    ("H2", 430.0),
    ("HD", 430.0),
    ("He", 100.0),
    ("C", 800.0),
    ("CH", 925.0),
    ("CH2", 1050.0),
    ("CH3", 1175.0),
    ("CH4", 1090.0),
    ("N", 800.0),
    ("NH", 2378.0),
    ("NH2", 3956.0),
    ("NH3", 5534.0),
    ("O", 800.0),
    ("O2", 1000.0),
    ("O3", 1800.0),
    ("OH", 2850.0),
    ("H2O", 4800.0),
    ("CO", 1150.0),
    ("CO2", 2575.0),
    ("N2", 790.0),
    ("NO", 1600.0),
    ("NO2", 2400.0),
    ("HNO", 2050.0),
    ("CN", 1600.0),
    ("HCN", 2050.0),
    ("HNC", 2050.0),
    ("HCO", 1600.0),
    ("H2CO", 2050.0),
    ("CH3OH", 4930.0),
    ("C2", 1600.0),
    ("C2H", 2137.0),
    ("C2H2", 2587.0),
    ("C2H3", 3037.0),
    ("C2H4", 3487.0),
    ("C2H5", 3937.0),
    ("C2H6", 4387.0),
    ("S", 1100.0),
    ("HS", 1500.0),
    ("H2S", 2743.0),
    ("CS", 1900.0),
    ("SO", 2600.0),
    ("SO2", 5330.0),
    ("OCS", 2888.0),
    ("Si", 2700.0),
    ("SiH", 13000.0),
    ("SiO", 3500.0),
    ("Mg", 5300.0),
    ("Fe", 4200.0),
    ("Na", 11800.0),
    ("HCOOH", 5570.0),
    ("CH3CN", 4680.0),
    ("NH2CHO", 5560.0),
];

pub fn element(symbol: &str) -> Option<&'static Element> {
    PERIODIC_TABLE.iter().find(|e| e.symbol == symbol)
}

/// Atomic mass of an element symbol in amu, None for unknown symbols
/// (pseudo elements, grain markers, the electron).
pub fn atomic_mass(symbol: &str) -> Option<f64> {
    element(symbol).map(|e| e.atomic_mass)
}

/// Integer mass number (protons + neutrons) of an element symbol.
pub fn mass_number(symbol: &str) -> Option<f64> {
    element(symbol).map(|e| (e.protons + e.neutrons) as f64)
}

/// Surface binding energy of a gas-phase species name in Kelvin.
pub fn binding_energy(gasname: &str) -> Option<f64> {
    BINDING_ENERGIES
        .iter()
        .find(|(n, _)| *n == gasname)
        .map(|(_, e)| *e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_atomic_masses() {
        assert_relative_eq!(atomic_mass("H").unwrap(), 1.008);
        assert_relative_eq!(atomic_mass("D").unwrap(), 2.014);
        assert_relative_eq!(atomic_mass("Fe").unwrap(), 55.845);
        assert!(atomic_mass("CR").is_none());
    }

    #[test]
    fn test_mass_numbers() {
        assert_relative_eq!(mass_number("H").unwrap(), 1.0);
        assert_relative_eq!(mass_number("D").unwrap(), 2.0);
        assert_relative_eq!(mass_number("C").unwrap(), 12.0);
        assert_relative_eq!(mass_number("O").unwrap(), 16.0);
    }

    #[test]
    fn test_binding_energies() {
        assert_relative_eq!(binding_energy("H").unwrap(), 600.0);
        assert_relative_eq!(binding_energy("CH4").unwrap(), 1090.0);
        assert!(binding_energy("Xe").is_none());
    }
}
