//! Species names and their derived properties. A species is parsed once,
//! against an explicit [`ChemContext`], and all derived quantities (charge,
//! elemental composition, alias, mass) are computed eagerly at construction.
//! Two Species instances compare equal when their names match; the electron
//! spellings "e-" and "E" collapse to the same species.
use crate::chemistrydata;
use crate::error::ChemNetError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Parsing context: the known element and pseudo-element vocabularies, the
/// surface and grain markers, and user overrides for surface quantities.
/// Kept explicit so two networks with different vocabularies can coexist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChemContext {
    pub elements: Vec<String>,
    pub pseudo_elements: Vec<String>,
    pub surface_prefix: String,
    pub grain_symbol: String,
    /// Binding-energy overrides in Kelvin, keyed by gas-phase species name.
    pub binding_energy: HashMap<String, f64>,
    /// Photodesorption-yield overrides, keyed by gas-phase species name.
    pub photon_yield: HashMap<String, f64>,
}

impl Default for ChemContext {
    fn default() -> Self {
        ChemContext {
            elements: [
                "e", "E", "H", "D", "He", "C", "N", "O", "F", "Na", "Mg", "Si",
                "P", "S", "Cl", "Ar", "Ca", "Fe", "Ni", "GRAIN",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            pseudo_elements: [
                "CR", "CRP", "CRPHOT", "PHOTON", "Photon", "XRAY", "X", "M",
                "g", "p", "o", "m", "c-", "l-",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            surface_prefix: "#".to_string(),
            grain_symbol: "GRAIN".to_string(),
            binding_energy: HashMap::new(),
            photon_yield: HashMap::new(),
        }
    }
}

impl ChemContext {
    pub fn with_surface_prefix(prefix: &str) -> Self {
        let mut ctx = ChemContext::default();
        ctx.surface_prefix = prefix.to_string();
        ctx
    }

    /// Register additional element symbols; names already known are skipped
    /// with a warning.
    pub fn add_elements(&mut self, symbols: &[&str]) {
        for s in symbols {
            if self.elements.iter().any(|e| e == s) {
                warn!("element {} is already defined, skipped", s);
            } else {
                self.elements.push(s.to_string());
            }
        }
    }

    pub fn add_pseudo_elements(&mut self, symbols: &[&str]) {
        for s in symbols {
            if self.pseudo_elements.iter().any(|e| e == s) {
                warn!("pseudo element {} is already defined, skipped", s);
            } else {
                self.pseudo_elements.push(s.to_string());
            }
        }
    }

    /// A name appearing in both vocabularies would make tokenization
    /// ambiguous, so that is rejected outright.
    pub fn check(&self) -> Result<(), ChemNetError> {
        let dup: Vec<String> = self
            .elements
            .iter()
            .filter(|e| self.pseudo_elements.contains(e))
            .cloned()
            .collect();
        if dup.is_empty() {
            Ok(())
        } else {
            Err(ChemNetError::DuplicateElements(dup))
        }
    }

    /// All tokens the name scanner may match, longest first so that greedy
    /// matching prefers "He" over "H".
    fn components(&self) -> Vec<&str> {
        let mut comps: Vec<&str> = self
            .elements
            .iter()
            .chain(self.pseudo_elements.iter())
            .map(|s| s.as_str())
            .collect();
        comps.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        comps
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    /// Name without surface prefix and without the charge suffix.
    pub basename: String,
    /// Gas-phase counterpart name (surface prefix removed, charge kept).
    pub gasname: String,
    /// C-identifier-safe alias used in generated code, e.g. "H2I", "eM".
    pub alias: String,
    pub charge: i32,
    pub is_surface: bool,
    pub is_grain: bool,
    /// Element symbol -> multiplicity; pseudo elements contribute nothing.
    pub element_count: BTreeMap<String, usize>,
    /// Molecular mass in amu, summed over the composition.
    pub mass: f64,
    /// Integer mass number (protons + neutrons) summed over the composition.
    pub massnumber: f64,
    binding_energy: Option<f64>,
    photon_yield: Option<f64>,
}

impl Species {
    /// Parse a species name within the given context. The whole name must be
    /// consumed by known element/pseudo-element tokens, otherwise the
    /// offending remainder is reported.
    pub fn parse(name: &str, ctx: &ChemContext) -> Result<Species, ChemNetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChemNetError::SpeciesParse {
                name: name.to_string(),
                token: String::new(),
            });
        }
        let electron = is_electron_name(name);

        // Charge suffix: a run of "+" or "-" at the end of the name.
        let plus = name.chars().rev().take_while(|c| *c == '+').count();
        let minus = name.chars().rev().take_while(|c| *c == '-').count();
        let stripped = &name[..name.len() - plus - minus];
        let charge = if electron {
            -1
        } else {
            plus as i32 - minus as i32
        };

        let is_grain = !ctx.grain_symbol.is_empty()
            && stripped.starts_with(&ctx.grain_symbol)
            && stripped[ctx.grain_symbol.len()..]
                .chars()
                .all(|c| c.is_ascii_digit());
        let is_surface = !is_grain
            && !ctx.surface_prefix.is_empty()
            && stripped.starts_with(&ctx.surface_prefix);

        let (basename, gasname) = if is_surface {
            (
                stripped[ctx.surface_prefix.len()..].to_string(),
                name[ctx.surface_prefix.len()..].to_string(),
            )
        } else {
            (stripped.to_string(), name.to_string())
        };

        let mut element_count: BTreeMap<String, usize> = BTreeMap::new();
        if is_grain {
            element_count.insert(ctx.grain_symbol.clone(), 1);
        } else {
            let comps = ctx.components();
            let mut pos = 0;
            while pos < basename.len() {
                let tail = &basename[pos..];
                let Some(tok) = comps.iter().find(|c| tail.starts_with(*c)) else {
                    return Err(ChemNetError::SpeciesParse {
                        name: name.to_string(),
                        token: tail.to_string(),
                    });
                };
                pos += tok.len();
                let ndigits = basename[pos..]
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .count();
                let mult = if ndigits == 0 {
                    1
                } else {
                    basename[pos..pos + ndigits].parse::<usize>().map_err(|_| {
                        ChemNetError::SpeciesParse {
                            name: name.to_string(),
                            token: basename[pos..pos + ndigits].to_string(),
                        }
                    })?
                };
                pos += ndigits;
                if ctx.elements.iter().any(|e| e == tok) {
                    *element_count.entry(tok.to_string()).or_insert(0) += mult;
                }
            }
        }

        let mass: f64 = element_count
            .iter()
            .filter_map(|(el, n)| chemistrydata::atomic_mass(el).map(|m| m * *n as f64))
            .sum();
        let massnumber: f64 = element_count
            .iter()
            .filter_map(|(el, n)| chemistrydata::mass_number(el).map(|m| m * *n as f64))
            .sum();
        if mass <= 0.0 && !electron && !is_grain {
            warn!("species {} has zero mass, no atomic data for it", name);
        }

        let alias = make_alias(&basename, charge, is_surface, ctx);

        let binding_energy = ctx
            .binding_energy
            .get(&gasname)
            .copied()
            .or_else(|| chemistrydata::binding_energy(&gasname));
        let photon_yield = ctx.photon_yield.get(&gasname).copied();

        Ok(Species {
            name: name.to_string(),
            basename,
            gasname,
            alias,
            charge,
            is_surface,
            is_grain,
            element_count,
            mass,
            massnumber,
            binding_energy,
            photon_yield,
        })
    }

    pub fn is_electron(&self) -> bool {
        is_electron_name(&self.name)
    }

    /// Binding energy in Kelvin. Only meaningful for surface species; a
    /// species with no tabulated or overridden value is an error because the
    /// grain rate formulas cannot be written without it.
    pub fn binding_energy(&self) -> Result<f64, ChemNetError> {
        if !self.is_surface {
            return Err(ChemNetError::NotSurfaceSpecies(self.name.clone()));
        }
        self.binding_energy
            .ok_or_else(|| ChemNetError::MissingBindingEnergy(self.name.clone()))
    }

    /// Photodesorption yield, falling back to `default` when no override
    /// exists for this species.
    pub fn photon_yield(&self, default: f64) -> f64 {
        self.photon_yield.unwrap_or(default)
    }

    pub fn n_atoms(&self) -> usize {
        self.element_count.values().sum()
    }

    /// The bare atomic form of an element, grain cores included.
    pub fn is_atom(&self) -> bool {
        self.n_atoms() == 1 && self.charge == 0 && !self.is_electron() && !self.is_surface
    }
}

/// Rank species by abundance, descending. With an element given, only
/// species containing that element are ranked and the abundance is weighted
/// by the element multiplicity, so the result lists the element's main
/// reservoirs. `rank` truncates the result; `None` returns the whole list.
pub fn top_abundant_species<'a>(
    species: &'a [Species],
    abundances: &[f64],
    element: Option<&str>,
    rank: Option<usize>,
) -> Result<Vec<(&'a Species, f64)>, ChemNetError> {
    let mut ranked: Vec<(&Species, f64)> = species
        .iter()
        .zip(abundances.iter().copied())
        .filter_map(|(sp, ab)| match element {
            None => Some((sp, ab)),
            Some(el) => sp
                .element_count
                .get(el)
                .map(|count| (sp, ab * *count as f64)),
        })
        .collect();
    if ranked.is_empty() {
        return Err(ChemNetError::MissingElement(
            element.unwrap_or("<any>").to_string(),
        ));
    }
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(n) = rank {
        ranked.truncate(n);
    }
    Ok(ranked)
}

pub(crate) fn is_electron_name(name: &str) -> bool {
    let upper = name.to_uppercase();
    upper == "E" || upper == "E-"
}

/// Alias rule: surface species get a "G" prefix, then the basename with
/// all-caps element spellings normalized, then the charge suffix: "I"
/// repeated (charge + 1) times for charge >= 0, "M" repeated |charge| times
/// for anions. "H2" -> "H2I", "e-" -> "eM", "#CO" -> "GCOI".
fn make_alias(basename: &str, charge: i32, is_surface: bool, ctx: &ChemContext) -> String {
    let mut body = basename.to_string();
    for el in chemistrydata::PERIODIC_TABLE {
        if el.symbol.len() > 1 {
            let upper = el.symbol.to_uppercase();
            if ctx.elements.iter().any(|e| *e == upper) {
                body = body.replace(&upper, el.symbol);
            }
        }
    }
    let prefix = if is_surface { "G" } else { "" };
    let suffix = if charge >= 0 {
        "I".repeat(charge as usize + 1)
    } else {
        "M".repeat((-charge) as usize)
    };
    format!("{}{}{}", prefix, body, suffix)
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        (self.is_electron() && other.is_electron()) || self.name == other.name
    }
}
impl Eq for Species {}

impl Hash for Species {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_electron() {
            "e-".hash(state);
        } else {
            self.name.hash(state);
        }
    }
}

impl PartialOrd for Species {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Species {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ctx() -> ChemContext {
        ChemContext::default()
    }

    #[test]
    fn test_element_count() {
        let sp = Species::parse("H2O", &ctx()).unwrap();
        assert_eq!(sp.element_count.get("H"), Some(&2));
        assert_eq!(sp.element_count.get("O"), Some(&1));
        let sp = Species::parse("C10", &ctx()).unwrap();
        assert_eq!(sp.element_count.get("C"), Some(&10));
        // greedy longest match: He, not H + e
        let sp = Species::parse("HeH+", &ctx()).unwrap();
        assert_eq!(sp.element_count.get("He"), Some(&1));
        assert_eq!(sp.element_count.get("H"), Some(&1));
    }

    #[test]
    fn test_charge() {
        assert_eq!(Species::parse("Si++++", &ctx()).unwrap().charge, 4);
        assert_eq!(Species::parse("H-", &ctx()).unwrap().charge, -1);
        assert_eq!(Species::parse("CO", &ctx()).unwrap().charge, 0);
        assert_eq!(Species::parse("e-", &ctx()).unwrap().charge, -1);
        assert_eq!(Species::parse("E", &ctx()).unwrap().charge, -1);
    }

    #[test]
    fn test_alias() {
        assert_eq!(Species::parse("H2", &ctx()).unwrap().alias, "H2I");
        assert_eq!(Species::parse("H2+", &ctx()).unwrap().alias, "H2II");
        assert_eq!(Species::parse("e-", &ctx()).unwrap().alias, "eM");
        assert_eq!(Species::parse("#CO", &ctx()).unwrap().alias, "GCOI");
        assert_eq!(Species::parse("oH2D+", &ctx()).unwrap().alias, "oH2DII");
    }

    #[test]
    fn test_surface_and_grain() {
        let sp = Species::parse("#CO", &ctx()).unwrap();
        assert!(sp.is_surface);
        assert_eq!(sp.gasname, "CO");
        assert_eq!(sp.basename, "CO");
        let gr = Species::parse("GRAIN0", &ctx()).unwrap();
        assert!(gr.is_grain);
        assert!(!gr.is_surface);
        assert_eq!(gr.element_count.get("GRAIN"), Some(&1));
        let leeds = ChemContext::with_surface_prefix("G");
        let sp = Species::parse("GCH3OH", &leeds).unwrap();
        assert!(sp.is_surface);
        assert_eq!(sp.gasname, "CH3OH");
    }

    #[test]
    fn test_mass() {
        let sp = Species::parse("CO", &ctx()).unwrap();
        assert_relative_eq!(sp.mass, 12.011 + 15.999);
        assert_relative_eq!(sp.massnumber, 28.0);
        assert_relative_eq!(Species::parse("HD", &ctx()).unwrap().massnumber, 3.0);
    }

    #[test]
    fn test_binding_energy() {
        let sp = Species::parse("#H", &ctx()).unwrap();
        assert_relative_eq!(sp.binding_energy().unwrap(), 600.0);
        let sp = Species::parse("#CH4", &ctx()).unwrap();
        assert_relative_eq!(sp.binding_energy().unwrap(), 1090.0);
        // override wins over the builtin table
        let mut c = ctx();
        c.binding_energy.insert("H".to_string(), 650.0);
        let sp = Species::parse("#H", &c).unwrap();
        assert_relative_eq!(sp.binding_energy().unwrap(), 650.0);
        // gas-phase species have no binding energy
        assert!(Species::parse("CO", &ctx()).unwrap().binding_energy().is_err());
    }

    #[test]
    fn test_electron_equality() {
        let a = Species::parse("e-", &ctx()).unwrap();
        let b = Species::parse("E", &ctx()).unwrap();
        assert_eq!(a, b);
        let mut set = std::collections::HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_invalid_names() {
        assert!(Species::parse("Qz", &ctx()).is_err());
        assert!(Species::parse("2H", &ctx()).is_err());
        assert!(Species::parse("", &ctx()).is_err());
    }

    #[test]
    fn test_is_atom() {
        assert!(Species::parse("C", &ctx()).unwrap().is_atom());
        assert!(Species::parse("GRAIN0", &ctx()).unwrap().is_atom());
        assert!(!Species::parse("C+", &ctx()).unwrap().is_atom());
        assert!(!Species::parse("CO", &ctx()).unwrap().is_atom());
        assert!(!Species::parse("#C", &ctx()).unwrap().is_atom());
        assert!(!Species::parse("e-", &ctx()).unwrap().is_atom());
    }

    #[test]
    fn test_top_abundant_species() {
        let c = ctx();
        let species: Vec<Species> = ["H2", "CO", "H2O", "e-"]
            .iter()
            .map(|n| Species::parse(n, &c).unwrap())
            .collect();
        let abundances = [0.5, 1.0e-4, 3.0e-4, 1.0e-8];
        let all = top_abundant_species(&species, &abundances, None, Some(2)).unwrap();
        assert_eq!(all[0].0.name, "H2");
        assert_eq!(all[1].0.name, "H2O");
        // oxygen reservoirs only, weighted by multiplicity
        let oxy = top_abundant_species(&species, &abundances, Some("O"), None).unwrap();
        assert_eq!(oxy.len(), 2);
        assert_eq!(oxy[0].0.name, "H2O");
        assert!(top_abundant_species(&species, &abundances, Some("Fe"), None).is_err());
    }

    #[test]
    fn test_context_duplicates() {
        let mut c = ctx();
        c.add_pseudo_elements(&["He"]);
        assert!(c.check().is_err());
    }
}
